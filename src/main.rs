//! AlarmSerialConsole - Main entry point
//!
//! On the ESP32-S3 target:
//! 1. Open the operator UART0 and the TX-only log UART1
//! 2. Load the deactivation code from NVS
//! 3. Poll the console every RTOS tick, drain logs when idle
//!
//! On the host the same session runs against stdin/stdout with a simulated
//! board, which is handy for trying the operator flow without hardware.

#![cfg_attr(target_os = "espidf", no_std, no_main)]

#[cfg(not(target_os = "espidf"))]
fn main() {
    host::run();
}

#[cfg(target_os = "espidf")]
#[no_mangle]
fn main() {
    firmware::run();
}

/// Version string (set by build.rs, includes git hash)
const VERSION: &str = env!("VERSION_STRING");

#[cfg(target_os = "espidf")]
mod firmware {
    use core::sync::atomic::{AtomicBool, AtomicI32, Ordering};

    use esp_idf_svc::hal::delay::NON_BLOCK;
    use esp_idf_svc::hal::gpio;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::uart::{self, UartDriver};
    use esp_idf_svc::hal::units::Hertz;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::sys as esp_idf_sys;

    use alarm_serial_console::config::nvs::NvsCodeStore;
    use alarm_serial_console::log_drain::{self, init_log_uart, LogUartConfig};
    use alarm_serial_console::peripherals::CODE_LENGTH;
    use alarm_serial_console::{
        ByteChannel, CodeStore, ConsoleConfig, ConsoleSession, DateTime, DateTimeStore, EventLog,
        RamEventLog, Sensors, SoftClock, TickEvent, CONSOLE_LOG,
    };

    /// Ctrl+C aborts code and date entry
    const CANCEL_KEY: u8 = 0x03;

    // Written by the siren, gas and LM35 tasks.
    pub static SIREN_ACTIVE: AtomicBool = AtomicBool::new(false);
    pub static GAS_DETECTED: AtomicBool = AtomicBool::new(false);
    pub static OVER_TEMPERATURE: AtomicBool = AtomicBool::new(false);
    /// Hundredths of a degree Celsius
    pub static TEMPERATURE_CENTI_C: AtomicI32 = AtomicI32::new(0);

    struct UartChannel<'d>(UartDriver<'d>);

    impl core::fmt::Write for UartChannel<'_> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            self.0.write(s.as_bytes()).map(|_| ()).map_err(|_| core::fmt::Error)
        }
    }

    impl ByteChannel for UartChannel<'_> {
        fn poll_byte(&mut self) -> Option<u8> {
            let mut byte = [0u8; 1];
            match self.0.read(&mut byte, NON_BLOCK) {
                Ok(1) => Some(byte[0]),
                _ => None,
            }
        }

        fn write_byte(&mut self, byte: u8) -> core::fmt::Result {
            self.0.write(&[byte]).map(|_| ()).map_err(|_| core::fmt::Error)
        }
    }

    struct AlarmBoard {
        code: NvsCodeStore,
        clock: SoftClock,
        events: RamEventLog,
    }

    impl Sensors for AlarmBoard {
        fn is_alarm_active(&self) -> bool {
            SIREN_ACTIVE.load(Ordering::Relaxed)
        }

        fn is_gas_detected(&self) -> bool {
            GAS_DETECTED.load(Ordering::Relaxed)
        }

        fn is_over_temperature(&self) -> bool {
            OVER_TEMPERATURE.load(Ordering::Relaxed)
        }

        fn temperature_celsius(&self) -> f32 {
            TEMPERATURE_CENTI_C.load(Ordering::Relaxed) as f32 / 100.0
        }

        fn temperature_fahrenheit(&self) -> f32 {
            self.temperature_celsius() * 9.0 / 5.0 + 32.0
        }
    }

    impl DateTimeStore for AlarmBoard {
        fn write_date_time(&mut self, dt: DateTime) {
            self.clock.set(dt, timestamp_us());
        }

        fn write_date_time_string(&self, out: &mut dyn core::fmt::Write) -> core::fmt::Result {
            self.clock.write_ctime(timestamp_us(), out)
        }
    }

    impl CodeStore for AlarmBoard {
        fn write_new_code(&mut self, code: &[u8; CODE_LENGTH]) {
            self.code.write_new_code(code);
        }
    }

    impl EventLog for AlarmBoard {
        fn event_count(&self) -> usize {
            self.events.event_count()
        }

        fn write_event(&self, index: usize, out: &mut dyn core::fmt::Write) -> core::fmt::Result {
            self.events.write_event(index, out)
        }
    }

    pub fn run() {
        // Initialize ESP-IDF
        esp_idf_sys::link_patches();

        let peripherals = Peripherals::take().expect("peripherals already taken");
        let nvs = EspDefaultNvsPartition::take().expect("NVS partition unavailable");

        let config = ConsoleConfig::new().with_cancel_key(CANCEL_KEY);

        let uart_config = uart::config::Config::default().baudrate(Hertz(config.baud_rate));
        let uart0 = UartDriver::new(
            peripherals.uart0,
            peripherals.pins.gpio43,
            peripherals.pins.gpio44,
            Option::<gpio::AnyIOPin>::None, // CTS
            Option::<gpio::AnyIOPin>::None, // RTS
            &uart_config,
        )
        .expect("UART0 init failed");
        let mut console = UartChannel(uart0);

        let mut log_uart = init_log_uart(
            peripherals.uart1,
            peripherals.pins.gpio6,
            &LogUartConfig::default(),
        )
        .expect("UART1 init failed");

        let mut board = AlarmBoard {
            code: NvsCodeStore::open(nvs).expect("NVS code store unavailable"),
            clock: SoftClock::new(),
            events: RamEventLog::new(),
        };

        let mut session = ConsoleSession::new(config);
        alarm_serial_console::log_info!(CONSOLE_LOG, 0, "{}", super::VERSION);
        session.init(&mut console);

        loop {
            match session.tick(&mut console, &mut board) {
                Ok(TickEvent::UnlockCodeEntered(code)) => {
                    if board.code.matches(&code) {
                        SIREN_ACTIVE.store(false, Ordering::Relaxed);
                        board.events.push("ALARM_OFF");
                    } else {
                        board.events.push("WRONG_CODE");
                    }
                    session.set_code_complete(false);
                }
                Ok(TickEvent::Idle) => {
                    log_drain::drain_to(&CONSOLE_LOG, &mut log_uart);
                }
                // Errors are already on the log stream
                Ok(_) | Err(_) => {}
            }

            unsafe {
                esp_idf_sys::vTaskDelay(1);
            }
        }
    }

    fn timestamp_us() -> i64 {
        unsafe { esp_idf_sys::esp_timer_get_time() }
    }
}

#[cfg(not(target_os = "espidf"))]
mod host {
    use std::io::{Read, Write as _};
    use std::sync::mpsc::{self, Receiver, TryRecvError};
    use std::thread;
    use std::time::{Duration, Instant};

    use alarm_serial_console::config::nvs::DEFAULT_CODE;
    use alarm_serial_console::log_drain;
    use alarm_serial_console::peripherals::CODE_LENGTH;
    use alarm_serial_console::{
        ByteChannel, CodeStore, ConsoleConfig, ConsoleSession, DateTime, DateTimeStore, EventLog,
        RamEventLog, Sensors, SoftClock, TickEvent, CONSOLE_LOG,
    };

    /// Stdin forwarded byte by byte from a reader thread
    struct StdioChannel {
        rx: Receiver<u8>,
        closed: bool,
    }

    impl StdioChannel {
        fn spawn() -> Self {
            let (tx, rx) = mpsc::channel();
            thread::spawn(move || {
                for byte in std::io::stdin().lock().bytes() {
                    match byte {
                        Ok(b) if tx.send(b).is_ok() => {}
                        _ => break,
                    }
                }
            });
            Self { rx, closed: false }
        }
    }

    impl core::fmt::Write for StdioChannel {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(s.as_bytes()).map_err(|_| core::fmt::Error)?;
            stdout.flush().map_err(|_| core::fmt::Error)
        }
    }

    impl ByteChannel for StdioChannel {
        fn poll_byte(&mut self) -> Option<u8> {
            loop {
                match self.rx.try_recv() {
                    // Line-buffered terminals send the Enter key too
                    Ok(b'\r' | b'\n') => continue,
                    Ok(b) => return Some(b),
                    Err(TryRecvError::Empty) => return None,
                    Err(TryRecvError::Disconnected) => {
                        self.closed = true;
                        return None;
                    }
                }
            }
        }

        fn write_byte(&mut self, byte: u8) -> core::fmt::Result {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&[byte]).map_err(|_| core::fmt::Error)?;
            stdout.flush().map_err(|_| core::fmt::Error)
        }
    }

    struct Stderr;

    impl core::fmt::Write for Stderr {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            std::io::stderr().write_all(s.as_bytes()).map_err(|_| core::fmt::Error)
        }
    }

    struct SimBoard {
        alarm_active: bool,
        celsius: f32,
        code: [u8; CODE_LENGTH],
        clock: SoftClock,
        started: Instant,
        events: RamEventLog,
    }

    impl SimBoard {
        fn now_us(&self) -> i64 {
            self.started.elapsed().as_micros() as i64
        }
    }

    impl Sensors for SimBoard {
        fn is_alarm_active(&self) -> bool {
            self.alarm_active
        }

        fn is_gas_detected(&self) -> bool {
            false
        }

        fn is_over_temperature(&self) -> bool {
            self.celsius > 50.0
        }

        fn temperature_celsius(&self) -> f32 {
            self.celsius
        }

        fn temperature_fahrenheit(&self) -> f32 {
            self.celsius * 9.0 / 5.0 + 32.0
        }
    }

    impl DateTimeStore for SimBoard {
        fn write_date_time(&mut self, dt: DateTime) {
            let now = self.now_us();
            self.clock.set(dt, now);
        }

        fn write_date_time_string(&self, out: &mut dyn core::fmt::Write) -> core::fmt::Result {
            self.clock.write_ctime(self.now_us(), out)
        }
    }

    impl CodeStore for SimBoard {
        fn write_new_code(&mut self, code: &[u8; CODE_LENGTH]) {
            self.code = *code;
        }
    }

    impl EventLog for SimBoard {
        fn event_count(&self) -> usize {
            self.events.event_count()
        }

        fn write_event(&self, index: usize, out: &mut dyn core::fmt::Write) -> core::fmt::Result {
            self.events.write_event(index, out)
        }
    }

    pub fn run() {
        let mut io = StdioChannel::spawn();
        let mut board = SimBoard {
            alarm_active: true,
            celsius: 23.5,
            // No NVS on host: start from the factory code every run
            code: DEFAULT_CODE,
            clock: SoftClock::new(),
            started: Instant::now(),
            events: RamEventLog::new(),
        };
        board.events.push("ALARM_ON");

        let mut session = ConsoleSession::new(ConsoleConfig::new().with_cancel_key(0x1B));
        alarm_serial_console::log_info!(CONSOLE_LOG, 0, "{} (host)", super::VERSION);
        session.init(&mut io);

        while !io.closed {
            match session.tick(&mut io, &mut board) {
                Ok(TickEvent::UnlockCodeEntered(code)) => {
                    if code == board.code {
                        board.alarm_active = false;
                        board.events.push("ALARM_OFF");
                    } else {
                        board.events.push("WRONG_CODE");
                    }
                    session.set_code_complete(false);
                }
                Ok(TickEvent::Idle) => {
                    log_drain::drain_to(&CONSOLE_LOG, &mut Stderr);
                    thread::sleep(Duration::from_millis(10));
                }
                Ok(_) | Err(_) => {}
            }
        }

        log_drain::drain_to(&CONSOLE_LOG, &mut Stderr);
    }
}
