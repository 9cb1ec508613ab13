//! Command handlers
//!
//! One key, one handler. Handlers never wait for more input: anything that
//! needs further keys returns a [`CommandAction`] and the session switches
//! mode for the following ticks.

use core::fmt::Write;
use crate::peripherals::{Board, ByteChannel};

/// Mode change requested by a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    /// Stay in command mode
    None,
    /// Collect the four-key deactivation code
    BeginUnlockCode,
    /// Collect a new four-key code for the code store
    BeginNewCode,
    /// Start the six-field date/time entry
    BeginDateEntry,
}

/// Command descriptor
pub struct CommandDescriptor {
    /// Keys that trigger the command
    pub keys: &'static [u8],
    /// Line shown in the help listing
    pub help: &'static str,
    pub handler: fn(&mut dyn ByteChannel, &dyn Board) -> CommandAction,
}

/// All available commands, in help listing order
pub static COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor { keys: b"1", help: "Press '1' to get the alarm state", handler: cmd_alarm_state },
    CommandDescriptor { keys: b"2", help: "Press '2' to get the gas detector state", handler: cmd_gas_state },
    CommandDescriptor { keys: b"3", help: "Press '3' to get the over temperature detector state", handler: cmd_over_temperature_state },
    CommandDescriptor { keys: b"4", help: "Press '4' to enter the code to deactivate the alarm", handler: cmd_enter_code },
    CommandDescriptor { keys: b"5", help: "Press '5' to enter a new code to deactivate the alarm", handler: cmd_enter_new_code },
    CommandDescriptor { keys: b"fF", help: "Press 'f' or 'F' to get lm35 reading in Fahrenheit", handler: cmd_temperature_fahrenheit },
    CommandDescriptor { keys: b"cC", help: "Press 'c' or 'C' to get lm35 reading in Celsius", handler: cmd_temperature_celsius },
    CommandDescriptor { keys: b"sS", help: "Press 's' or 'S' to set the date and time", handler: cmd_set_date_time },
    CommandDescriptor { keys: b"tT", help: "Press 't' or 'T' to get the date and time", handler: cmd_show_date_time },
    CommandDescriptor { keys: b"eE", help: "Press 'e' or 'E' to get the stored events", handler: cmd_show_events },
];

/// Run the command bound to `key`, or print the help listing
pub fn dispatch(key: u8, out: &mut dyn ByteChannel, board: &dyn Board) -> CommandAction {
    match find_command(key) {
        Some(cmd) => (cmd.handler)(out, board),
        None => {
            print_help(out);
            CommandAction::None
        }
    }
}

pub fn find_command(key: u8) -> Option<&'static CommandDescriptor> {
    COMMANDS.iter().find(|c| c.keys.contains(&key))
}

/// Help listing, also used as the boot banner
pub fn print_help(out: &mut dyn ByteChannel) {
    let _ = out.write_str("Available commands:\r\n");
    for c in COMMANDS {
        let _ = write!(out, "{}\r\n", c.help);
    }
    let _ = out.write_str("\r\n");
}

// --- Command Implementations ---

fn cmd_alarm_state(out: &mut dyn ByteChannel, board: &dyn Board) -> CommandAction {
    if board.is_alarm_active() {
        let _ = out.write_str("The alarm is activated\r\n");
    } else {
        let _ = out.write_str("The alarm is not activated\r\n");
    }
    CommandAction::None
}

fn cmd_gas_state(out: &mut dyn ByteChannel, board: &dyn Board) -> CommandAction {
    if board.is_gas_detected() {
        let _ = out.write_str("Gas is being detected\r\n");
    } else {
        let _ = out.write_str("Gas is not being detected\r\n");
    }
    CommandAction::None
}

fn cmd_over_temperature_state(out: &mut dyn ByteChannel, board: &dyn Board) -> CommandAction {
    if board.is_over_temperature() {
        let _ = out.write_str("Temperature is above the maximum level\r\n");
    } else {
        let _ = out.write_str("Temperature is below the maximum level\r\n");
    }
    CommandAction::None
}

fn cmd_enter_code(out: &mut dyn ByteChannel, board: &dyn Board) -> CommandAction {
    if !board.is_alarm_active() {
        let _ = out.write_str("Alarm is not activated.\r\n");
        return CommandAction::None;
    }

    let _ = out.write_str("Please enter the four digits numeric code ");
    let _ = out.write_str("to deactivate the alarm: ");
    CommandAction::BeginUnlockCode
}

fn cmd_enter_new_code(out: &mut dyn ByteChannel, _board: &dyn Board) -> CommandAction {
    let _ = out.write_str("Please enter the new four digits numeric code ");
    let _ = out.write_str("to deactivate the alarm: ");
    CommandAction::BeginNewCode
}

fn cmd_temperature_celsius(out: &mut dyn ByteChannel, board: &dyn Board) -> CommandAction {
    let _ = write!(out, "Temperature: {:.2} \u{b0} C\r\n", board.temperature_celsius());
    CommandAction::None
}

fn cmd_temperature_fahrenheit(out: &mut dyn ByteChannel, board: &dyn Board) -> CommandAction {
    let _ = write!(out, "Temperature: {:.2} \u{b0} F\r\n", board.temperature_fahrenheit());
    CommandAction::None
}

fn cmd_set_date_time(_out: &mut dyn ByteChannel, _board: &dyn Board) -> CommandAction {
    // Prompt comes from the first date-entry tick
    CommandAction::BeginDateEntry
}

fn cmd_show_date_time(out: &mut dyn ByteChannel, board: &dyn Board) -> CommandAction {
    let _ = out.write_str("Date and Time = ");
    let _ = board.write_date_time_string(&mut TextOut(&mut *out));
    let _ = out.write_str("\r\n");
    CommandAction::None
}

fn cmd_show_events(out: &mut dyn ByteChannel, board: &dyn Board) -> CommandAction {
    for i in 0..board.event_count() {
        let _ = board.write_event(i, &mut TextOut(&mut *out));
        let _ = out.write_str("\r\n");
    }
    CommandAction::None
}

/// Lets stores format straight into the channel
struct TextOut<'a>(&'a mut dyn ByteChannel);

impl Write for TextOut<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.0.write_str(s)
    }
}
