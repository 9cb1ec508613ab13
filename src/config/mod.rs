//! Module: config
//!
//! Purpose: Console configuration and persistent code storage.
//!
//! Architecture:
//! - `ConsoleConfig`: plain `Copy` struct, fixed at session construction
//! - `nvs`: deactivation code persisted in NVS on the target

pub mod nvs;

#[cfg(target_os = "espidf")]
pub use nvs::NvsError;

/// Operator console configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// UART0 baud rate.
    pub baud_rate: u32,
    /// Start the date/time entry on the first tick after boot.
    pub date_entry_on_boot: bool,
    /// Key that aborts code or date entry. `None` disables aborting.
    pub cancel_key: Option<u8>,
}

impl ConsoleConfig {
    pub const fn new() -> Self {
        Self {
            baud_rate: 115200,
            date_entry_on_boot: true,
            cancel_key: None,
        }
    }

    /// Boot straight into command mode
    pub const fn without_boot_date_entry(mut self) -> Self {
        self.date_entry_on_boot = false;
        self
    }

    pub const fn with_cancel_key(mut self, key: u8) -> Self {
        self.cancel_key = Some(key);
        self
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::new()
    }
}
