//! Log drain: moves entries from a [`LogStream`] to a text sink.
//!
//! On the target the sink is a TX-only UART1 on GPIO6, so diagnostics never
//! mix with the operator console on UART0.
//!
//! ```text
//! ESP32-S3 GPIO6 (TX) ──────▶ USB-UART RX
//!                              └─▶ PC Serial Monitor
//! ```

use core::fmt::Write;
use crate::logging::{LogEntry, LogStream};

/// UART configuration for the log line. The TX pin is handed to
/// `init_log_uart` as a peripheral.
pub struct LogUartConfig {
    pub baud_rate: u32,
}

impl Default for LogUartConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
        }
    }
}

/// Format: `[tick] LEVEL: message\r\n`
pub fn format_log_entry(entry: &LogEntry, out: &mut dyn Write) -> core::fmt::Result {
    write!(out, "[{:10}] {}: {}\r\n", entry.tick, entry.level.as_str(), entry.message())
}

/// Drain every pending entry into `out`, then report drops if any.
///
/// Returns the number of entries written.
pub fn drain_to<const N: usize>(stream: &LogStream<N>, out: &mut dyn Write) -> usize {
    let mut written = 0;
    while let Some(entry) = stream.drain() {
        let _ = format_log_entry(&entry, out);
        written += 1;
    }

    let dropped = stream.dropped();
    if dropped > 0 {
        let _ = write!(out, "[WARN] Dropped: {}\r\n", dropped);
        stream.reset_dropped();
    }

    written
}

#[cfg(target_os = "espidf")]
pub use target::{init_log_uart, LogUart};

#[cfg(target_os = "espidf")]
mod target {
    use super::LogUartConfig;
    use esp_idf_svc::hal::gpio;
    use esp_idf_svc::hal::peripheral::Peripheral;
    use esp_idf_svc::hal::uart::{self, UartTxDriver};

    /// `fmt::Write` over a TX-only UART driver.
    pub struct LogUart<'d>(pub UartTxDriver<'d>);

    impl core::fmt::Write for LogUart<'_> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            self.0.write(s.as_bytes()).map(|_| ()).map_err(|_| core::fmt::Error)
        }
    }

    /// Initialize UART1 TX-only for log output.
    pub fn init_log_uart<'d>(
        uart: impl Peripheral<P = uart::UART1> + 'd,
        tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
        config: &LogUartConfig,
    ) -> Result<LogUart<'d>, esp_idf_svc::sys::EspError> {
        let uart_config = uart::config::Config::default()
            .baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

        let driver = UartTxDriver::new(
            uart,
            tx_pin,
            Option::<gpio::AnyIOPin>::None, // CTS
            Option::<gpio::AnyIOPin>::None, // RTS
            &uart_config,
        )?;
        Ok(LogUart(driver))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;

    #[test]
    fn test_format_log_entry() {
        let stream = LogStream::<4>::new();
        stream.push(1234, LogLevel::Info, b"Hello world");
        let entry = stream.drain().unwrap();

        let mut text = String::new();
        format_log_entry(&entry, &mut text).unwrap();

        assert!(text.contains("1234"));
        assert!(text.contains("INFO: Hello world"));
        assert!(text.ends_with("\r\n"));
    }

    #[test]
    fn test_drain_writes_all_and_reports_drops() {
        let stream = LogStream::<2>::new();
        stream.push(1, LogLevel::Info, b"first");
        stream.push(2, LogLevel::Error, b"second");
        stream.push(3, LogLevel::Info, b"lost");

        let mut text = String::new();
        assert_eq!(drain_to(&stream, &mut text), 2);

        assert!(text.contains("INFO: first"));
        assert!(text.contains("ERROR: second"));
        assert!(!text.contains("lost"));
        assert!(text.contains("Dropped: 1"));
        assert_eq!(stream.dropped(), 0);
    }

    #[test]
    fn test_log_uart_default_baud() {
        assert_eq!(LogUartConfig::default().baud_rate, 115200);
    }

    #[test]
    fn test_drain_empty_stream_is_silent() {
        let stream = LogStream::<2>::new();
        let mut text = String::new();

        assert_eq!(drain_to(&stream, &mut text), 0);
        assert!(text.is_empty());
    }
}
