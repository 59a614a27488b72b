//! Escape and undo/redo tests

mod common;

use common::{assert_cursor, cursor, editor_at, run, text, GRID};
use pipetab::TableCommand;

#[test]
fn test_escape_moves_below_table() {
    let input = "| a   |\n| --- |\n| b   |\nnext\n";
    let mut ed = editor_at(input, 0, 2);
    run(&mut ed, &[TableCommand::Escape]);
    assert_eq!(ed.text(), input);
    assert_cursor(&ed, 3, 0);
}

#[test]
fn test_escape_at_end_of_buffer_adds_line() {
    let mut ed = editor_at("| a | b |\n| c | d |", 0, 2);
    run(&mut ed, &[TableCommand::Escape]);

    assert_eq!(
        ed.text(),
        text(&["| a   | b   |", "| --- | --- |", "| c   | d   |"])
    );
    assert_cursor(&ed, 3, 0);
}

#[test]
fn test_escape_onto_existing_empty_last_line() {
    let mut ed = editor_at(GRID, 3, 2);
    run(&mut ed, &[TableCommand::Escape]);
    assert_eq!(ed.text(), GRID);
    assert_cursor(&ed, 4, 0);
}

#[test]
fn test_undo_restores_text_and_cursor() {
    let input = "| a | b |\n|---|---|\n";
    let mut ed = editor_at(input, 0, 6);
    run(&mut ed, &[TableCommand::NextCell]);
    assert_eq!(ed.text(), "| a   | b   |     |\n| --- | --- | --- |\n");

    assert!(ed.undo());
    assert_eq!(ed.text(), input);
    assert_eq!(cursor(&ed), (0, 6));
    assert!(!ed.can_undo());

    assert!(ed.redo());
    assert_eq!(ed.text(), "| a   | b   |     |\n| --- | --- | --- |\n");
    assert_eq!(cursor(&ed), (0, 14));
}

#[test]
fn test_each_command_is_one_undo_step() {
    let mut ed = editor_at("| a | b |\n| c | d |\n", 0, 2);
    run(
        &mut ed,
        &[TableCommand::Format, TableCommand::InsertRow],
    );
    assert_eq!(
        ed.text(),
        text(&["| a   | b   |", "| --- | --- |", "|     |     |", "| c   | d   |"])
    );

    assert!(ed.undo());
    assert_eq!(
        ed.text(),
        text(&["| a   | b   |", "| --- | --- |", "| c   | d   |"])
    );
    assert!(ed.undo());
    assert_eq!(ed.text(), "| a | b |\n| c | d |\n");
    assert!(!ed.undo());
}

#[test]
fn test_selection_only_commands_leave_no_history() {
    let mut ed = editor_at(GRID, 0, 2);
    run(
        &mut ed,
        &[
            TableCommand::NextCell,
            TableCommand::NextRow,
            TableCommand::PreviousCell,
        ],
    );
    assert!(!ed.can_undo());
}
