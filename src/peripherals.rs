//! Collaborator interfaces used by the console.
//!
//! The console owns no peripheral state. Siren, sensors, stores and the
//! UART are reached through these traits so the state machine runs on host.

use core::fmt::Write;

/// Non-blocking byte source/sink (the operator UART).
///
/// Text goes out through [`core::fmt::Write`]; write failures are ignored by
/// the console, exactly like the rest of the output path.
pub trait ByteChannel: Write {
    /// Return the next pending byte, or `None` if nothing has arrived.
    ///
    /// Must never block.
    fn poll_byte(&mut self) -> Option<u8>;

    /// Send one byte as is, without UTF-8 encoding (raw echo).
    fn write_byte(&mut self, byte: u8) -> core::fmt::Result;
}

/// Siren, gas detector and LM35 temperature readings.
pub trait Sensors {
    fn is_alarm_active(&self) -> bool;
    fn is_gas_detected(&self) -> bool;
    fn is_over_temperature(&self) -> bool;
    fn temperature_celsius(&self) -> f32;
    fn temperature_fahrenheit(&self) -> f32;
}

/// Calendar date and time as typed by the operator.
///
/// Fields are not range-checked: month 99 is stored as 99.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTime {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
}

impl DateTime {
    pub const fn new(year: i32, month: i32, day: i32, hour: i32, minute: i32, second: i32) -> Self {
        Self { year, month, day, hour, minute, second }
    }
}

/// Real-time clock store.
pub trait DateTimeStore {
    /// Commit a new date and time.
    fn write_date_time(&mut self, dt: DateTime);

    /// Write the current date and time as human-readable text.
    fn write_date_time_string(&self, out: &mut dyn Write) -> core::fmt::Result;
}

/// Persistent deactivation code store.
pub trait CodeStore {
    /// Replace the stored code with `code`, verbatim.
    fn write_new_code(&mut self, code: &[u8; CODE_LENGTH]);
}

/// Stored alarm events.
pub trait EventLog {
    /// Number of stored events.
    fn event_count(&self) -> usize;

    /// Write event `index` (0 = oldest) as one line of text, no terminator.
    fn write_event(&self, index: usize, out: &mut dyn Write) -> core::fmt::Result;
}

/// Everything the console talks to besides the UART.
pub trait Board: Sensors + DateTimeStore + CodeStore + EventLog {}

impl<T: Sensors + DateTimeStore + CodeStore + EventLog> Board for T {}

/// Number of keys in a deactivation code.
pub const CODE_LENGTH: usize = 4;
