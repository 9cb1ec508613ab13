//! Date/time entry state machine tests

mod common;

use alarm_serial_console::console::date_entry::{DateEntryState, DateEntryStatus, DateTimeEntryMachine};
use alarm_serial_console::DateTime;
use common::{TestBoard, TestChannel};

/// Drive the machine like the session does: no byte in Init, one byte per tick after
fn run(machine: &mut DateTimeEntryMachine, input: &[u8], out: &mut TestChannel, board: &mut TestBoard) -> Vec<DateEntryStatus> {
    let mut statuses = vec![machine.tick(None, out, board).unwrap()];
    for &b in input {
        statuses.push(machine.tick(Some(b), out, board).unwrap());
    }
    statuses
}

#[test]
fn test_first_tick_prompts_for_year() {
    let mut machine = DateTimeEntryMachine::new();
    let mut out = TestChannel::new();
    let mut board = TestBoard::new();

    assert_eq!(machine.state(), DateEntryState::Init);
    assert_eq!(machine.tick(None, &mut out, &mut board), Ok(DateEntryStatus::Pending));

    assert_eq!(machine.state(), DateEntryState::Year);
    assert_eq!(out.output, "\r\nType four digits for the current year (YYYY): ");
}

#[test]
fn test_full_sequence_commits_once() {
    let mut machine = DateTimeEntryMachine::new();
    let mut out = TestChannel::new();
    let mut board = TestBoard::new();

    let statuses = run(&mut machine, b"20240115083000", &mut out, &mut board);

    let expected = DateTime::new(2024, 1, 15, 8, 30, 0);
    assert_eq!(statuses.last(), Some(&DateEntryStatus::Complete(expected)));
    assert_eq!(
        statuses.iter().filter(|s| matches!(s, DateEntryStatus::Complete(_))).count(),
        1
    );
    assert_eq!(board.date_writes, vec![expected]);
    assert_eq!(machine.state(), DateEntryState::Init);
    assert!(out.contains("Date and time has been set\r\n"));
}

#[test]
fn test_states_advance_in_order() {
    let mut machine = DateTimeEntryMachine::new();
    let mut out = TestChannel::new();
    let mut board = TestBoard::new();

    machine.tick(None, &mut out, &mut board).unwrap();
    let mut seen = vec![machine.state()];
    for &b in b"20240115083000" {
        machine.tick(Some(b), &mut out, &mut board).unwrap();
        if seen.last() != Some(&machine.state()) {
            seen.push(machine.state());
        }
    }

    assert_eq!(
        seen,
        vec![
            DateEntryState::Year,
            DateEntryState::Month,
            DateEntryState::Day,
            DateEntryState::Hour,
            DateEntryState::Minute,
            DateEntryState::Second,
            DateEntryState::Init,
        ]
    );
}

#[test]
fn test_prompts_and_echo_transcript() {
    let mut machine = DateTimeEntryMachine::new();
    let mut out = TestChannel::new();
    let mut board = TestBoard::new();

    run(&mut machine, b"20240115083000", &mut out, &mut board);

    let expected = "\r\nType four digits for the current year (YYYY): 2024\r\n\
Type two digits for the current month (01-12): 01\r\n\
Type two digits for the current day (01-31): 15\r\n\
Type two digits for the current hour (00-23): 08\r\n\
Type two digits for the current minutes (00-59): 30\r\n\
Type two digits for the current seconds (00-59): 00\r\n\
Date and time has been set\r\n";
    assert_eq!(out.output, expected);
}

#[test]
fn test_no_byte_is_noop_mid_field() {
    let mut machine = DateTimeEntryMachine::new();
    let mut out = TestChannel::new();
    let mut board = TestBoard::new();

    run(&mut machine, b"2024" as &[u8], &mut out, &mut board);
    machine.tick(Some(b'0'), &mut out, &mut board).unwrap();
    let before = out.output.clone();

    for _ in 0..10 {
        assert_eq!(machine.tick(None, &mut out, &mut board), Ok(DateEntryStatus::Pending));
    }

    assert_eq!(machine.state(), DateEntryState::Month);
    assert_eq!(machine.cursor(), 1);
    assert_eq!(out.output, before);
}

#[test]
fn test_garbage_is_accepted_unvalidated() {
    let mut machine = DateTimeEntryMachine::new();
    let mut out = TestChannel::new();
    let mut board = TestBoard::new();

    run(&mut machine, b"20x49999aa7760", &mut out, &mut board);

    assert_eq!(board.date_writes, vec![DateTime::new(20, 99, 99, 0, 77, 60)]);
}

#[test]
fn test_second_session_starts_clean() {
    let mut machine = DateTimeEntryMachine::new();
    let mut out = TestChannel::new();
    let mut board = TestBoard::new();

    run(&mut machine, b"20240115083000", &mut out, &mut board);
    run(&mut machine, b"19991231235959", &mut out, &mut board);

    assert_eq!(
        board.date_writes,
        vec![DateTime::new(2024, 1, 15, 8, 30, 0), DateTime::new(1999, 12, 31, 23, 59, 59)]
    );
}

#[test]
fn test_cancel_discards_partial_input() {
    let mut machine = DateTimeEntryMachine::new();
    let mut out = TestChannel::new();
    let mut board = TestBoard::new();

    run(&mut machine, b"20240", &mut out, &mut board);
    machine.cancel();

    assert_eq!(machine.state(), DateEntryState::Init);
    assert_eq!(machine.cursor(), 0);
    assert!(board.date_writes.is_empty());
}
