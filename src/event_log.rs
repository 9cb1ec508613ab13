//! RAM event log.
//!
//! Fixed ring of short text records. When full, the oldest record is
//! overwritten; index 0 is always the oldest surviving event.

use core::fmt::Write;
use crate::peripherals::EventLog;

/// Maximum stored length of one event, in bytes.
pub const EVENT_STR_LENGTH: usize = 64;

/// Default capacity.
pub const EVENT_LOG_MAX_STORAGE: usize = 20;

#[derive(Clone, Copy)]
struct Record {
    len: usize,
    text: [u8; EVENT_STR_LENGTH],
}

/// Event ring with `N` slots
pub struct RamEventLog<const N: usize = EVENT_LOG_MAX_STORAGE> {
    records: [Record; N],
    /// Next slot to write
    head: usize,
    count: usize,
}

impl<const N: usize> RamEventLog<N> {
    pub const fn new() -> Self {
        assert!(N > 0, "Event log needs at least one slot");

        Self {
            records: [Record { len: 0, text: [0u8; EVENT_STR_LENGTH] }; N],
            head: 0,
            count: 0,
        }
    }

    /// Append an event, truncated to [`EVENT_STR_LENGTH`] on a char boundary
    pub fn push(&mut self, event: &str) {
        let mut len = event.len().min(EVENT_STR_LENGTH);
        while !event.is_char_boundary(len) {
            len -= 1;
        }

        let record = &mut self.records[self.head];
        record.text[..len].copy_from_slice(&event.as_bytes()[..len]);
        record.len = len;

        self.head = (self.head + 1) % N;
        self.count = (self.count + 1).min(N);
    }

    /// Event `index`, 0 = oldest
    pub fn get(&self, index: usize) -> Option<&str> {
        if index >= self.count {
            return None;
        }
        let idx = (self.head + N - self.count + index) % N;
        let record = &self.records[idx];
        core::str::from_utf8(&record.text[..record.len]).ok()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.count = 0;
    }
}

impl<const N: usize> Default for RamEventLog<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EventLog for RamEventLog<N> {
    fn event_count(&self) -> usize {
        self.count
    }

    fn write_event(&self, index: usize, out: &mut dyn Write) -> core::fmt::Result {
        match self.get(index) {
            Some(text) => out.write_str(text),
            None => Ok(()),
        }
    }
}
