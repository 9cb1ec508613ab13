//! Fixed-length input accumulator
//!
//! Collects exactly `N` bytes across any number of ticks. The cursor lives
//! in the struct, so a partially typed field survives between polls.

use core::fmt::Write;
use super::ConsoleError;
use crate::peripherals::ByteChannel;

/// Result of feeding one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulatorStatus {
    /// More bytes needed
    Pending,
    /// Cursor reached the target length
    Complete,
}

/// What is written back to the channel for each accepted byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Echo {
    /// Echo the byte as typed
    Raw,
    /// Echo a fixed mask character instead (code entry)
    Mask(char),
}

/// Bounded character accumulator
pub struct InputAccumulator<const N: usize> {
    buf: [u8; N],
    cursor: usize,
    echo: Echo,
}

impl<const N: usize> InputAccumulator<N> {
    /// Create empty accumulator
    pub const fn new(echo: Echo) -> Self {
        Self {
            buf: [0u8; N],
            cursor: 0,
            echo,
        }
    }

    /// Store `byte` at the cursor and echo it.
    ///
    /// Feeding a complete accumulator is a caller bug: it returns
    /// [`ConsoleError::BufferOverflow`] and leaves buffer, cursor and channel
    /// untouched.
    pub fn feed(&mut self, byte: u8, out: &mut dyn ByteChannel) -> Result<AccumulatorStatus, ConsoleError> {
        if self.cursor >= N {
            return Err(ConsoleError::BufferOverflow);
        }

        self.buf[self.cursor] = byte;
        self.cursor += 1;

        let _ = match self.echo {
            Echo::Raw => out.write_byte(byte),
            Echo::Mask(c) => out.write_char(c),
        };

        if self.is_complete() {
            Ok(AccumulatorStatus::Complete)
        } else {
            Ok(AccumulatorStatus::Pending)
        }
    }

    /// Rewind the cursor for a new session
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Bytes received so far
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Target length
    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn is_complete(&self) -> bool {
        self.cursor == N
    }

    /// Received bytes (`buf[..cursor]`)
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.cursor]
    }

    /// Whole buffer, meaningful once complete
    pub fn buffer(&self) -> &[u8; N] {
        &self.buf
    }
}
