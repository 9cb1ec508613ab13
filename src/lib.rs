//! # AlarmSerialConsole
//!
//! Serial command console for an embedded alarm system.
//!
//! ## Architecture
//!
//! All operator input flows through [`ConsoleSession`]. One byte per tick,
//! never blocking:
//! - Command mode maps a single character to an action
//! - Code entry collects four masked characters
//! - Date entry walks six fields, one accumulator each
//!
//! Peripherals (siren, sensors, stores) are reached only through the traits
//! in [`peripherals`]. No heap, no globals in the state machine.

#![cfg_attr(not(test), no_std)]

pub mod clock;
pub mod config;
pub mod console;
pub mod event_log;
pub mod log_drain;
pub mod log_globals;
pub mod logging;
pub mod peripherals;

pub use clock::SoftClock;
pub use config::ConsoleConfig;
pub use console::{ConsoleError, ConsoleSession, Mode, TickEvent};
pub use event_log::RamEventLog;
pub use log_globals::CONSOLE_LOG;
pub use peripherals::{Board, ByteChannel, CodeStore, DateTime, DateTimeStore, EventLog, Sensors};
