//! Diagnostic logging for the alarm console.
//!
//! # Architecture
//!
//! ```text
//! Console loop           LogStream            Log UART
//! ────────────           ─────────            ────────
//!
//! log_info!() ────────▶ [L0][L1][L2] ──────▶ UART1 TX
//! non-blocking           ring buffer          drained when idle
//! ```
//!
//! # Rules
//!
//! - The operator UART never carries log lines
//! - Pushing never blocks; messages are dropped if the ring is full
//! - Entries are stamped with the console tick, not wall time

use core::cell::RefCell;
use critical_section::Mutex;

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 80;

/// Log buffer size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 64;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Console tick at which the entry was pushed.
    pub tick: u32,
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    pub const EMPTY: Self = Self {
        tick: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text, `<invalid utf8>` if the bytes were cut mid-character.
    pub fn message(&self) -> &str {
        core::str::from_utf8(&self.msg[..self.len as usize]).unwrap_or("<invalid utf8>")
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

struct Ring<const N: usize> {
    entries: [LogEntry; N],
    write_idx: u32,
    read_idx: u32,
    dropped: u32,
}

/// Bounded log ring shared between the console loop and the drain.
///
/// Every access runs inside a critical section, so any number of producers
/// and consumers are allowed.
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    ring: Mutex<RefCell<Ring<N>>>,
}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty log stream.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");

        Self {
            ring: Mutex::new(RefCell::new(Ring {
                entries: [LogEntry::EMPTY; N],
                write_idx: 0,
                read_idx: 0,
                dropped: 0,
            })),
        }
    }

    /// Push a log entry, never blocks.
    ///
    /// Returns `true` if message was queued, `false` if dropped (ring full).
    /// Messages longer than [`MAX_MSG_LEN`] are truncated.
    pub fn push(&self, tick: u32, level: LogLevel, msg: &[u8]) -> bool {
        critical_section::with(|cs| {
            let mut ring = self.ring.borrow_ref_mut(cs);

            if ring.write_idx.wrapping_sub(ring.read_idx) >= N as u32 {
                ring.dropped = ring.dropped.saturating_add(1);
                return false;
            }

            let idx = (ring.write_idx as usize) & Self::MASK;
            let len = msg.len().min(MAX_MSG_LEN);

            let entry = &mut ring.entries[idx];
            entry.tick = tick;
            entry.level = level;
            entry.len = len as u8;
            entry.msg[..len].copy_from_slice(&msg[..len]);

            ring.write_idx = ring.write_idx.wrapping_add(1);
            true
        })
    }

    /// Drain next log entry.
    ///
    /// Returns `None` if no entries available.
    pub fn drain(&self) -> Option<LogEntry> {
        critical_section::with(|cs| {
            let mut ring = self.ring.borrow_ref_mut(cs);

            if ring.read_idx == ring.write_idx {
                return None;
            }

            let idx = (ring.read_idx as usize) & Self::MASK;
            let entry = ring.entries[idx];
            ring.read_idx = ring.read_idx.wrapping_add(1);
            Some(entry)
        })
    }

    /// Get count of dropped messages.
    pub fn dropped(&self) -> u32 {
        critical_section::with(|cs| self.ring.borrow_ref(cs).dropped)
    }

    /// Reset dropped counter (e.g., after reporting).
    pub fn reset_dropped(&self) {
        critical_section::with(|cs| self.ring.borrow_ref_mut(cs).dropped = 0);
    }

    /// Check if there are entries to drain.
    pub fn has_entries(&self) -> bool {
        self.pending() > 0
    }

    /// Get number of entries waiting to be drained.
    pub fn pending(&self) -> u32 {
        critical_section::with(|cs| {
            let ring = self.ring.borrow_ref(cs);
            ring.write_idx.wrapping_sub(ring.read_idx)
        })
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a message into a buffer, truncating at the end of `buf`.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    use core::fmt::Write;

    struct BufWriter<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl Write for BufWriter<'_> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let bytes = s.as_bytes();
            let remaining = self.buf.len() - self.pos;
            let to_write = bytes.len().min(remaining);
            self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
            self.pos += to_write;
            Ok(())
        }
    }

    let mut writer = BufWriter { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// Formatting log macro.
///
/// # Example
///
/// ```ignore
/// console_log!(LogLevel::Info, CONSOLE_LOG, tick, "mode {:?}", mode);
/// ```
#[macro_export]
macro_rules! console_log {
    ($level:expr, $stream:expr, $tick:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
        let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
        $stream.push($tick, $level, &buf[..len]);
    }};
}

/// Info log.
#[macro_export]
macro_rules! log_info {
    ($stream:expr, $tick:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Info, $stream, $tick, $($arg)*)
    };
}

/// Warning log.
#[macro_export]
macro_rules! log_warn {
    ($stream:expr, $tick:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Warn, $stream, $tick, $($arg)*)
    };
}

/// Error log.
#[macro_export]
macro_rules! log_error {
    ($stream:expr, $tick:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Error, $stream, $tick, $($arg)*)
    };
}
