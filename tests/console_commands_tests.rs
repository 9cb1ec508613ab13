//! Command handler tests

mod common;

use alarm_serial_console::console::commands::{dispatch, find_command, print_help, CommandAction, COMMANDS};
use common::{TestBoard, TestChannel, HELP_TEXT};

fn run(key: u8, board: &TestBoard) -> (CommandAction, String) {
    let mut out = TestChannel::new();
    let action = dispatch(key, &mut out, board);
    (action, out.output)
}

#[test]
fn test_command_registry_has_all_keys() {
    for key in *b"12345cCfFsStTeE" {
        assert!(find_command(key).is_some(), "Key '{}' should be in registry", key as char);
    }
    assert_eq!(COMMANDS.len(), 10);
}

#[test]
fn test_help_listing() {
    let mut out = TestChannel::new();
    print_help(&mut out);
    assert_eq!(out.output, HELP_TEXT);
}

#[test]
fn test_unknown_key_prints_help() {
    let board = TestBoard::new();
    for key in [b'z', b'0', b'?', b' '] {
        let (action, text) = run(key, &board);
        assert_eq!(action, CommandAction::None);
        assert_eq!(text, HELP_TEXT);
    }
}

#[test]
fn test_alarm_state() {
    let mut board = TestBoard::new();
    assert_eq!(run(b'1', &board).1, "The alarm is not activated\r\n");

    board.alarm_active = true;
    assert_eq!(run(b'1', &board).1, "The alarm is activated\r\n");
}

#[test]
fn test_gas_state() {
    let mut board = TestBoard::new();
    assert_eq!(run(b'2', &board).1, "Gas is not being detected\r\n");

    board.gas_detected = true;
    assert_eq!(run(b'2', &board).1, "Gas is being detected\r\n");
}

#[test]
fn test_over_temperature_state() {
    let mut board = TestBoard::new();
    assert_eq!(run(b'3', &board).1, "Temperature is below the maximum level\r\n");

    board.over_temperature = true;
    assert_eq!(run(b'3', &board).1, "Temperature is above the maximum level\r\n");
}

#[test]
fn test_enter_code_requires_active_alarm() {
    let mut board = TestBoard::new();
    let (action, text) = run(b'4', &board);
    assert_eq!(action, CommandAction::None);
    assert_eq!(text, "Alarm is not activated.\r\n");

    board.alarm_active = true;
    let (action, text) = run(b'4', &board);
    assert_eq!(action, CommandAction::BeginUnlockCode);
    assert_eq!(text, "Please enter the four digits numeric code to deactivate the alarm: ");
}

#[test]
fn test_enter_new_code_is_unconditional() {
    let board = TestBoard::new();
    let (action, text) = run(b'5', &board);
    assert_eq!(action, CommandAction::BeginNewCode);
    assert_eq!(text, "Please enter the new four digits numeric code to deactivate the alarm: ");
}

#[test]
fn test_temperature_celsius_two_decimals() {
    let mut board = TestBoard::new();
    board.celsius = 23.456;

    for key in [b'c', b'C'] {
        assert_eq!(run(key, &board).1, "Temperature: 23.46 \u{b0} C\r\n");
    }
}

#[test]
fn test_temperature_fahrenheit_uses_fahrenheit_reading_and_label() {
    let mut board = TestBoard::new();
    board.celsius = 20.0;
    board.fahrenheit = 68.0;

    for key in [b'f', b'F'] {
        assert_eq!(run(key, &board).1, "Temperature: 68.00 \u{b0} F\r\n");
    }
}

#[test]
fn test_set_date_requests_date_entry() {
    let board = TestBoard::new();
    for key in [b's', b'S'] {
        let (action, text) = run(key, &board);
        assert_eq!(action, CommandAction::BeginDateEntry);
        assert!(text.is_empty());
    }
}

#[test]
fn test_show_date_time() {
    let board = TestBoard::new();
    for key in [b't', b'T'] {
        assert_eq!(run(key, &board).1, "Date and Time = Mon Jan 15 08:30:00 2024\r\n");
    }
}

#[test]
fn test_show_events_in_index_order() {
    let mut board = TestBoard::new();
    assert_eq!(run(b'e', &board).1, "");

    board.events = vec!["ALARM_ON".to_string(), "GAS_DET".to_string(), "ALARM_OFF".to_string()];
    assert_eq!(run(b'E', &board).1, "ALARM_ON\r\nGAS_DET\r\nALARM_OFF\r\n");
}
