//! Shared test doubles: scripted byte channel and recording board

#![allow(dead_code)]

use std::collections::VecDeque;

use alarm_serial_console::peripherals::CODE_LENGTH;
use alarm_serial_console::{ByteChannel, CodeStore, DateTime, DateTimeStore, EventLog, Sensors};

/// Channel fed from a script, recording everything written
pub struct TestChannel {
    input: VecDeque<u8>,
    /// Text view of everything written (non-ASCII raw bytes omitted)
    pub output: String,
    /// Exact bytes put on the wire
    pub wire: Vec<u8>,
}

impl TestChannel {
    pub fn new() -> Self {
        Self { input: VecDeque::new(), output: String::new(), wire: Vec::new() }
    }

    pub fn with_input(bytes: &[u8]) -> Self {
        let mut ch = Self::new();
        ch.send(bytes);
        ch
    }

    pub fn send(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().copied());
    }

    pub fn pending(&self) -> usize {
        self.input.len()
    }

    pub fn contains(&self, s: &str) -> bool {
        self.output.contains(s)
    }

    /// Return and forget the output so far
    pub fn take_output(&mut self) -> String {
        self.wire.clear();
        std::mem::take(&mut self.output)
    }
}

impl core::fmt::Write for TestChannel {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.output.push_str(s);
        self.wire.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

impl ByteChannel for TestChannel {
    fn poll_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn write_byte(&mut self, byte: u8) -> core::fmt::Result {
        if byte.is_ascii() {
            self.output.push(byte as char);
        }
        self.wire.push(byte);
        Ok(())
    }
}

/// Board with settable readings that records every store write
pub struct TestBoard {
    pub alarm_active: bool,
    pub gas_detected: bool,
    pub over_temperature: bool,
    pub celsius: f32,
    pub fahrenheit: f32,
    pub date_writes: Vec<DateTime>,
    pub date_text: String,
    pub codes_written: Vec<[u8; CODE_LENGTH]>,
    pub events: Vec<String>,
}

impl TestBoard {
    pub fn new() -> Self {
        Self {
            alarm_active: false,
            gas_detected: false,
            over_temperature: false,
            celsius: 21.5,
            fahrenheit: 70.7,
            date_writes: Vec::new(),
            date_text: "Mon Jan 15 08:30:00 2024".to_string(),
            codes_written: Vec::new(),
            events: Vec::new(),
        }
    }
}

impl Sensors for TestBoard {
    fn is_alarm_active(&self) -> bool {
        self.alarm_active
    }

    fn is_gas_detected(&self) -> bool {
        self.gas_detected
    }

    fn is_over_temperature(&self) -> bool {
        self.over_temperature
    }

    fn temperature_celsius(&self) -> f32 {
        self.celsius
    }

    fn temperature_fahrenheit(&self) -> f32 {
        self.fahrenheit
    }
}

impl DateTimeStore for TestBoard {
    fn write_date_time(&mut self, dt: DateTime) {
        self.date_writes.push(dt);
    }

    fn write_date_time_string(&self, out: &mut dyn core::fmt::Write) -> core::fmt::Result {
        out.write_str(&self.date_text)
    }
}

impl CodeStore for TestBoard {
    fn write_new_code(&mut self, code: &[u8; CODE_LENGTH]) {
        self.codes_written.push(*code);
    }
}

impl EventLog for TestBoard {
    fn event_count(&self) -> usize {
        self.events.len()
    }

    fn write_event(&self, index: usize, out: &mut dyn core::fmt::Write) -> core::fmt::Result {
        out.write_str(&self.events[index])
    }
}

/// Full help listing as printed at boot
pub const HELP_TEXT: &str = "Available commands:\r\n\
Press '1' to get the alarm state\r\n\
Press '2' to get the gas detector state\r\n\
Press '3' to get the over temperature detector state\r\n\
Press '4' to enter the code to deactivate the alarm\r\n\
Press '5' to enter a new code to deactivate the alarm\r\n\
Press 'f' or 'F' to get lm35 reading in Fahrenheit\r\n\
Press 'c' or 'C' to get lm35 reading in Celsius\r\n\
Press 's' or 'S' to set the date and time\r\n\
Press 't' or 'T' to get the date and time\r\n\
Press 'e' or 'E' to get the stored events\r\n\
\r\n";
