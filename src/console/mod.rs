//! Serial console for the alarm system
//!
//! Non-blocking, one byte per tick.
//! Zero heap allocation - all fixed buffers.

pub mod accumulator;
pub mod code_entry;
pub mod commands;
pub mod date_entry;
pub mod error;
pub mod session;

pub use accumulator::{AccumulatorStatus, Echo, InputAccumulator};
pub use code_entry::CodeEntry;
pub use commands::{dispatch, print_help, CommandAction, COMMANDS};
pub use date_entry::{DateEntryState, DateEntryStatus, DateTimeEntryMachine};
pub use error::ConsoleError;
pub use session::{ConsoleSession, Mode, TickEvent};
