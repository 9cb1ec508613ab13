//! Four-key code entry (unlock and new-code)
//!
//! Both modes share one shape: masked echo, four bytes, done.

use super::accumulator::{AccumulatorStatus, Echo, InputAccumulator};
use super::ConsoleError;
use crate::peripherals::{ByteChannel, CODE_LENGTH};

/// Masked four-key entry
pub struct CodeEntry {
    keys: InputAccumulator<CODE_LENGTH>,
}

impl CodeEntry {
    pub const fn new() -> Self {
        Self {
            keys: InputAccumulator::new(Echo::Mask('*')),
        }
    }

    /// Start a fresh entry session
    pub fn begin(&mut self) {
        self.keys.reset();
    }

    /// Feed one key. Returns the full code once the fourth key arrives.
    pub fn feed(&mut self, byte: u8, out: &mut dyn ByteChannel) -> Result<Option<[u8; CODE_LENGTH]>, ConsoleError> {
        match self.keys.feed(byte, out)? {
            AccumulatorStatus::Pending => Ok(None),
            AccumulatorStatus::Complete => {
                let code = *self.keys.buffer();
                self.keys.reset();
                Ok(Some(code))
            }
        }
    }

    /// Keys typed in the current session
    pub fn typed(&self) -> usize {
        self.keys.cursor()
    }
}

impl Default for CodeEntry {
    fn default() -> Self {
        Self::new()
    }
}
