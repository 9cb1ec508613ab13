//! Console session: owns the mode and routes each polled byte.
//!
//! ```text
//! tick ─┬─ date entry active ─▶ DateTimeEntryMachine
//!       └─ poll one byte ──────▶ Commands | UnlockCode | NewCode
//! ```
//!
//! Completion is reported through [`TickEvent`]; the unlock code is also
//! latched for the alarm controller until it clears the flag.

use core::fmt::Write;

use super::code_entry::CodeEntry;
use super::commands::{self, CommandAction};
use super::date_entry::{DateEntryState, DateEntryStatus, DateTimeEntryMachine};
use super::ConsoleError;
use crate::config::ConsoleConfig;
use crate::logging::LogStream;
use crate::peripherals::{Board, ByteChannel, DateTime, CODE_LENGTH};
use crate::{log_error, log_info};

/// Top-level dispatch state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Commands,
    EnteringUnlockCode,
    EnteringNewCode,
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Nothing pending
    Idle,
    /// A byte or prompt was processed, nothing completed
    Handled,
    /// Fourth unlock key received
    UnlockCodeEntered([u8; CODE_LENGTH]),
    /// New code handed to the code store
    NewCodeSaved,
    /// Date/time committed to the store
    DateTimeSet(DateTime),
    /// Code or date entry aborted with the cancel key
    Cancelled,
}

/// Console state machine
pub struct ConsoleSession {
    config: ConsoleConfig,
    mode: Mode,
    date_entry_active: bool,
    date_entry: DateTimeEntryMachine,
    unlock: CodeEntry,
    new_code: CodeEntry,
    /// Latched until the alarm controller clears it
    code_complete: bool,
    entered_code: [u8; CODE_LENGTH],
    ticks: u32,
    log: &'static LogStream,
}

impl ConsoleSession {
    /// Create a session logging to [`crate::CONSOLE_LOG`]
    pub fn new(config: ConsoleConfig) -> Self {
        Self::with_log(config, &crate::log_globals::CONSOLE_LOG)
    }

    pub const fn with_log(config: ConsoleConfig, log: &'static LogStream) -> Self {
        Self {
            config,
            mode: Mode::Commands,
            date_entry_active: config.date_entry_on_boot,
            date_entry: DateTimeEntryMachine::new(),
            unlock: CodeEntry::new(),
            new_code: CodeEntry::new(),
            code_complete: false,
            entered_code: [0u8; CODE_LENGTH],
            ticks: 0,
            log,
        }
    }

    /// Print the command listing (boot banner)
    pub fn init(&self, io: &mut dyn ByteChannel) {
        commands::print_help(io);
    }

    /// Process at most one byte. Never blocks.
    pub fn tick(&mut self, io: &mut dyn ByteChannel, board: &mut dyn Board) -> Result<TickEvent, ConsoleError> {
        self.ticks = self.ticks.wrapping_add(1);

        let result = if self.date_entry_active {
            self.tick_date_entry(io, board)
        } else {
            match io.poll_byte() {
                None => Ok(TickEvent::Idle),
                Some(byte) => self.dispatch(byte, io, board),
            }
        };

        if let Err(e) = result {
            log_error!(self.log, self.ticks, "{} in {:?}", e, self.mode);
        }
        result
    }

    fn dispatch(&mut self, byte: u8, io: &mut dyn ByteChannel, board: &mut dyn Board) -> Result<TickEvent, ConsoleError> {
        if self.mode != Mode::Commands && self.is_cancel(byte) {
            let _ = io.write_str("\r\nEntry cancelled\r\n");
            log_info!(self.log, self.ticks, "{:?} cancelled", self.mode);
            self.set_mode(Mode::Commands);
            return Ok(TickEvent::Cancelled);
        }

        match self.mode {
            Mode::Commands => self.run_command(byte, io, board),
            Mode::EnteringUnlockCode => match self.unlock.feed(byte, io)? {
                None => Ok(TickEvent::Handled),
                Some(code) => {
                    self.entered_code = code;
                    self.code_complete = true;
                    self.set_mode(Mode::Commands);
                    Ok(TickEvent::UnlockCodeEntered(code))
                }
            },
            Mode::EnteringNewCode => match self.new_code.feed(byte, io)? {
                None => Ok(TickEvent::Handled),
                Some(code) => {
                    board.write_new_code(&code);
                    let _ = io.write_str("\r\nNew code configured\r\n\r\n");
                    log_info!(self.log, self.ticks, "new code saved");
                    self.set_mode(Mode::Commands);
                    Ok(TickEvent::NewCodeSaved)
                }
            },
        }
    }

    fn run_command(&mut self, byte: u8, io: &mut dyn ByteChannel, board: &mut dyn Board) -> Result<TickEvent, ConsoleError> {
        match commands::dispatch(byte, io, &*board) {
            CommandAction::None => {}
            CommandAction::BeginUnlockCode => {
                self.code_complete = false;
                self.unlock.begin();
                self.set_mode(Mode::EnteringUnlockCode);
            }
            CommandAction::BeginNewCode => {
                self.new_code.begin();
                self.set_mode(Mode::EnteringNewCode);
            }
            CommandAction::BeginDateEntry => {
                self.date_entry.cancel();
                self.date_entry_active = true;
                log_info!(self.log, self.ticks, "date entry started");
                return self.tick_date_entry(io, board);
            }
        }
        Ok(TickEvent::Handled)
    }

    fn tick_date_entry(&mut self, io: &mut dyn ByteChannel, board: &mut dyn Board) -> Result<TickEvent, ConsoleError> {
        // The Init step only prints the first prompt; reading here would drop a byte
        let byte = match self.date_entry.state() {
            DateEntryState::Init => None,
            _ => io.poll_byte(),
        };

        if let Some(b) = byte {
            if self.is_cancel(b) {
                let _ = io.write_str("\r\nEntry cancelled\r\n");
                log_info!(self.log, self.ticks, "date entry cancelled");
                self.date_entry.cancel();
                self.date_entry_active = false;
                return Ok(TickEvent::Cancelled);
            }
        }

        let started = self.date_entry.state() == DateEntryState::Init;
        match self.date_entry.tick(byte, io, board)? {
            DateEntryStatus::Pending if byte.is_none() && !started => Ok(TickEvent::Idle),
            DateEntryStatus::Pending => Ok(TickEvent::Handled),
            DateEntryStatus::Complete(dt) => {
                self.date_entry_active = false;
                log_info!(
                    self.log,
                    self.ticks,
                    "date set {:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                    dt.year, dt.month, dt.day, dt.hour, dt.minute, dt.second
                );
                Ok(TickEvent::DateTimeSet(dt))
            }
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            log_info!(self.log, self.ticks, "mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    fn is_cancel(&self, byte: u8) -> bool {
        self.config.cancel_key == Some(byte)
    }

    /// Write raw text to the console
    pub fn write_str(&self, io: &mut dyn ByteChannel, text: &str) {
        let _ = io.write_str(text);
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// True while date entry owns every tick
    pub fn date_entry_active(&self) -> bool {
        self.date_entry_active
    }

    pub fn date_state(&self) -> DateEntryState {
        self.date_entry.state()
    }

    /// Cursor of the accumulator currently collecting input
    pub fn cursor(&self) -> usize {
        if self.date_entry_active {
            return self.date_entry.cursor();
        }
        match self.mode {
            Mode::Commands => 0,
            Mode::EnteringUnlockCode => self.unlock.typed(),
            Mode::EnteringNewCode => self.new_code.typed(),
        }
    }

    /// Unlock code complete and not yet consumed
    pub fn code_complete(&self) -> bool {
        self.code_complete
    }

    pub fn set_code_complete(&mut self, state: bool) {
        self.code_complete = state;
    }

    /// Last unlock code entered
    pub fn entered_code(&self) -> &[u8; CODE_LENGTH] {
        &self.entered_code
    }
}
