//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use pipetab::editable::{Position, Selection};
use pipetab::{CommandOutcome, RopeEditor, TableCommand, TableEditor, TableOptions, TextEditor};

/// A formatted 3x3 table (header, alignment row, two body rows).
///
/// Cell `k` spans columns `1 + 6k .. 6 + 6k`; its content starts at `2 + 6k`.
pub const GRID: &str = "\
| a   | b   | c   |
| --- | --- | --- |
| d   | e   | f   |
| g   | h   | i   |
";

/// Create an editor with the given text and cursor position
pub fn editor_at(text: &str, line: usize, column: usize) -> RopeEditor {
    RopeEditor::from_text(text).with_cursor(Position::new(line, column))
}

/// Run commands in order with default options, asserting each one applies
pub fn run(editor: &mut RopeEditor, commands: &[TableCommand]) -> TableEditor {
    run_with(editor, commands, &TableOptions::default())
}

/// Run commands in order with `options`, asserting each one applies
pub fn run_with(
    editor: &mut RopeEditor,
    commands: &[TableCommand],
    options: &TableOptions,
) -> TableEditor {
    let mut engine = TableEditor::new();
    for &command in commands {
        assert_eq!(
            engine.execute(editor, command, options),
            CommandOutcome::Applied,
            "{:?} did not apply",
            command
        );
    }
    engine
}

/// Cursor as `(line, column)`
pub fn cursor(editor: &RopeEditor) -> (usize, usize) {
    let pos = editor.cursor_position();
    (pos.line, pos.column)
}

/// Assert a single-line selection of `start..end` on `line`
pub fn assert_selected(editor: &RopeEditor, line: usize, start: usize, end: usize) {
    assert_eq!(
        editor.selection(),
        Selection::new(Position::new(line, start), Position::new(line, end)),
        "expected {}:{}..{} selected in\n{}",
        line,
        start,
        end,
        editor.text()
    );
}

/// Assert nothing is selected and the cursor is at `(line, column)`
pub fn assert_cursor(editor: &RopeEditor, line: usize, column: usize) {
    assert!(
        editor.selection().is_empty(),
        "unexpected selection {:?}",
        editor.selection()
    );
    assert_eq!(cursor(editor), (line, column));
}

/// Join lines with a trailing newline
pub fn text(lines: &[&str]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
