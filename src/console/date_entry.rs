//! Date and time entry state machine
//!
//! Six fields, one accumulator each, advanced one byte per tick:
//!
//! ```text
//! Init ─▶ Year ─▶ Month ─▶ Day ─▶ Hour ─▶ Minute ─▶ Second ─┐
//!  ▲                                                        │
//!  └──────────────── commit to DateTimeStore ◀──────────────┘
//! ```
//!
//! No range validation: "99" is a valid month here, the store decides.

use core::fmt::Write;
use super::accumulator::{AccumulatorStatus, Echo, InputAccumulator};
use super::ConsoleError;
use crate::peripherals::{ByteChannel, DateTime, DateTimeStore};

const YEAR_PROMPT: &str = "\r\nType four digits for the current year (YYYY): ";
const MONTH_PROMPT: &str = "Type two digits for the current month (01-12): ";
const DAY_PROMPT: &str = "Type two digits for the current day (01-31): ";
const HOUR_PROMPT: &str = "Type two digits for the current hour (00-23): ";
const MINUTE_PROMPT: &str = "Type two digits for the current minutes (00-59): ";
const SECOND_PROMPT: &str = "Type two digits for the current seconds (00-59): ";
const DONE_MESSAGE: &str = "Date and time has been set\r\n";

/// Field currently being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateEntryState {
    /// Not started: next tick prints the year prompt
    Init,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateEntryStatus {
    /// Still collecting
    Pending,
    /// All six fields received and committed
    Complete(DateTime),
}

/// Date/time entry FSM
pub struct DateTimeEntryMachine {
    state: DateEntryState,
    year: InputAccumulator<4>,
    month: InputAccumulator<2>,
    day: InputAccumulator<2>,
    hour: InputAccumulator<2>,
    minute: InputAccumulator<2>,
    second: InputAccumulator<2>,
}

impl DateTimeEntryMachine {
    pub const fn new() -> Self {
        Self {
            state: DateEntryState::Init,
            year: InputAccumulator::new(Echo::Raw),
            month: InputAccumulator::new(Echo::Raw),
            day: InputAccumulator::new(Echo::Raw),
            hour: InputAccumulator::new(Echo::Raw),
            minute: InputAccumulator::new(Echo::Raw),
            second: InputAccumulator::new(Echo::Raw),
        }
    }

    pub fn state(&self) -> DateEntryState {
        self.state
    }

    /// Cursor of the field being collected (0 in `Init`)
    pub fn cursor(&self) -> usize {
        match self.state {
            DateEntryState::Init => 0,
            DateEntryState::Year => self.year.cursor(),
            DateEntryState::Month => self.month.cursor(),
            DateEntryState::Day => self.day.cursor(),
            DateEntryState::Hour => self.hour.cursor(),
            DateEntryState::Minute => self.minute.cursor(),
            DateEntryState::Second => self.second.cursor(),
        }
    }

    /// Advance the machine by at most one byte.
    ///
    /// In `Init` the year prompt is written and no byte is consumed, so the
    /// caller must pass `None` (or accept that the byte is dropped) on that
    /// first tick. Every later tick with `None` is a no-op.
    pub fn tick<S: DateTimeStore + ?Sized>(
        &mut self,
        byte: Option<u8>,
        out: &mut dyn ByteChannel,
        store: &mut S,
    ) -> Result<DateEntryStatus, ConsoleError> {
        let byte = match (self.state, byte) {
            (DateEntryState::Init, _) => {
                self.clear_fields();
                let _ = out.write_str(YEAR_PROMPT);
                self.state = DateEntryState::Year;
                return Ok(DateEntryStatus::Pending);
            }
            (_, None) => return Ok(DateEntryStatus::Pending),
            (_, Some(b)) => b,
        };

        let status = match self.state {
            DateEntryState::Init => return Ok(DateEntryStatus::Pending),
            DateEntryState::Year => self.year.feed(byte, out)?,
            DateEntryState::Month => self.month.feed(byte, out)?,
            DateEntryState::Day => self.day.feed(byte, out)?,
            DateEntryState::Hour => self.hour.feed(byte, out)?,
            DateEntryState::Minute => self.minute.feed(byte, out)?,
            DateEntryState::Second => self.second.feed(byte, out)?,
        };

        if status == AccumulatorStatus::Pending {
            return Ok(DateEntryStatus::Pending);
        }

        let _ = out.write_str("\r\n");

        let (next, prompt) = match self.state {
            DateEntryState::Year => (DateEntryState::Month, MONTH_PROMPT),
            DateEntryState::Month => (DateEntryState::Day, DAY_PROMPT),
            DateEntryState::Day => (DateEntryState::Hour, HOUR_PROMPT),
            DateEntryState::Hour => (DateEntryState::Minute, MINUTE_PROMPT),
            DateEntryState::Minute => (DateEntryState::Second, SECOND_PROMPT),
            DateEntryState::Second => {
                let dt = self.collected();
                let _ = out.write_str(DONE_MESSAGE);
                store.write_date_time(dt);
                self.clear_fields();
                self.state = DateEntryState::Init;
                return Ok(DateEntryStatus::Complete(dt));
            }
            DateEntryState::Init => return Ok(DateEntryStatus::Pending),
        };

        let _ = out.write_str(prompt);
        self.state = next;
        Ok(DateEntryStatus::Pending)
    }

    /// Drop any partial input and return to `Init`.
    pub fn cancel(&mut self) {
        self.clear_fields();
        self.state = DateEntryState::Init;
    }

    fn collected(&self) -> DateTime {
        DateTime::new(
            parse_field(self.year.as_bytes()),
            parse_field(self.month.as_bytes()),
            parse_field(self.day.as_bytes()),
            parse_field(self.hour.as_bytes()),
            parse_field(self.minute.as_bytes()),
            parse_field(self.second.as_bytes()),
        )
    }

    fn clear_fields(&mut self) {
        self.year.reset();
        self.month.reset();
        self.day.reset();
        self.hour.reset();
        self.minute.reset();
        self.second.reset();
    }
}

impl Default for DateTimeEntryMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a field the way C `atoi` does.
///
/// Leading whitespace and one sign are accepted, digits are read up to the
/// first non-digit. No digits yields 0. Saturates instead of overflowing.
pub fn parse_field(bytes: &[u8]) -> i32 {
    let mut rest = bytes;
    while let [b, tail @ ..] = rest {
        if b.is_ascii_whitespace() {
            rest = tail;
        } else {
            break;
        }
    }

    let negative = match rest {
        [b'-', tail @ ..] => {
            rest = tail;
            true
        }
        [b'+', tail @ ..] => {
            rest = tail;
            false
        }
        _ => false,
    };

    let mut value: i32 = 0;
    for &b in rest.iter().take_while(|b| b.is_ascii_digit()) {
        value = value.saturating_mul(10).saturating_add((b - b'0') as i32);
    }

    if negative {
        -value
    } else {
        value
    }
}
