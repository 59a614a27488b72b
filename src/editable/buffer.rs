//! Line-oriented text editor interface and a rope-backed implementation.
//!
//! Table commands only ever talk to a [`TextEditor`]. [`RopeEditor`] is the
//! in-memory host used by the CLI and the tests.

use std::cell::OnceCell;
use std::ops::Range;

use ropey::Rope;

use super::cursor::Position;
use super::history::{EditHistory, EditOperation, Transaction};
use super::selection::Selection;

/// The buffer operations table commands need from a host editor.
///
/// Rows and columns are zero-based; columns count characters.
pub trait TextEditor {
    /// Text of a line without its line terminator (empty if out of range)
    fn line(&self, row: usize) -> String;

    /// Index of the last line
    fn last_row(&self) -> usize;

    /// Replace lines `start..end` with `lines`
    fn replace_lines(&mut self, start: usize, end: usize, lines: &[String]);

    /// Insert a line before `row` (appends when `row` is past the end)
    fn insert_line(&mut self, row: usize, text: &str) {
        self.replace_lines(row, row, &[text.to_string()]);
    }

    fn delete_line(&mut self, row: usize) {
        self.replace_lines(row, row + 1, &[]);
    }

    fn cursor_position(&self) -> Position;

    fn set_cursor_position(&mut self, pos: Position);

    fn set_selection_range(&mut self, selection: Selection);

    /// Whether table commands may edit the given row
    fn accepts_table_edit(&self, _row: usize) -> bool {
        true
    }

    fn has_multiple_cursors(&self) -> bool {
        false
    }

    /// Run `f` as one atomic edit (a single undo step)
    fn transact(&mut self, f: &mut dyn FnMut(&mut Self)) {
        f(self)
    }
}

/// Fence character and run length of a line that opens or closes a code block
fn fence_marker(line: &str) -> Option<(char, usize)> {
    let trimmed = line.trim_start();
    let ch = trimmed.chars().next().filter(|&c| c == '`' || c == '~')?;
    let len = trimmed.chars().take_while(|&c| c == ch).count();
    (len >= 3).then_some((ch, len))
}

/// For each line, whether it belongs to a fenced code block (fence lines included).
///
/// A block closes only on a run of the same character at least as long as the
/// one that opened it.
fn fenced_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<bool> {
    let mut open: Option<(char, usize)> = None;
    lines
        .map(|line| {
            let marker = fence_marker(line);
            match (open, marker) {
                (None, Some(m)) => open = Some(m),
                (Some((ch, len)), Some((c, l))) if c == ch && l >= len => open = None,
                (None, None) => return false,
                _ => {}
            }
            true
        })
        .collect()
}

/// In-memory editor over a `ropey::Rope` with undo/redo.
#[derive(Debug, Clone, Default)]
pub struct RopeEditor {
    rope: Rope,
    selection: Selection,
    history: EditHistory,
    pending: Option<Transaction>,
    multiple_cursors: bool,
    /// Lazily computed fenced-line map, dropped on every edit
    fenced: OnceCell<Vec<bool>>,
}

impl RopeEditor {
    pub fn new() -> Self {
        Self::from_text("")
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: Selection::default(),
            history: EditHistory::new(),
            pending: None,
            multiple_cursors: false,
            fenced: OnceCell::new(),
        }
    }

    /// Builder: place the cursor
    pub fn with_cursor(mut self, pos: Position) -> Self {
        self.selection = Selection::collapsed(pos);
        self
    }

    /// Pretend the host has several cursors (table commands refuse to run)
    pub fn set_multiple_cursors(&mut self, multiple: bool) {
        self.multiple_cursors = multiple;
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Undo the last transaction. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.pop_undo() {
            Some(transaction) => {
                self.revert(&transaction);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone transaction
    pub fn redo(&mut self) -> bool {
        match self.history.pop_redo() {
            Some(transaction) => {
                self.revert(&transaction);
                true
            }
            None => false,
        }
    }

    fn revert(&mut self, transaction: &Transaction) {
        for op in transaction.operations.iter().rev() {
            let end = op.offset + op.inserted_text.chars().count();
            self.rope.remove(op.offset..end);
            self.rope.insert(op.offset, &op.deleted_text);
        }
        self.selection = transaction.selection_before;
        self.fenced.take();
    }

    /// Replace a character range, recording the edit
    fn edit(&mut self, range: Range<usize>, text: &str) {
        if range.is_empty() && text.is_empty() {
            return;
        }
        let deleted = self.rope.slice(range.clone()).to_string();
        if deleted == text {
            return;
        }
        self.rope.remove(range.clone());
        self.rope.insert(range.start, text);
        self.fenced.take();

        let op = EditOperation::replace(range.start, deleted, text.to_string());
        match self.pending.as_mut() {
            Some(transaction) => transaction.operations.push(op),
            None => {
                let mut transaction = Transaction::new(self.selection);
                transaction.operations.push(op);
                self.history.push(transaction);
            }
        }
    }
}

impl TextEditor for RopeEditor {
    fn line(&self, row: usize) -> String {
        if row >= self.rope.len_lines() {
            return String::new();
        }
        let mut line = self.rope.line(row).to_string();
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        line
    }

    fn last_row(&self) -> usize {
        self.rope.len_lines().saturating_sub(1)
    }

    fn replace_lines(&mut self, start: usize, end: usize, lines: &[String]) {
        let line_count = self.rope.len_lines();
        let start = start.min(line_count);
        let end = end.clamp(start, line_count);
        let len_chars = self.rope.len_chars();

        // Appending past the last line
        if start == line_count {
            if !lines.is_empty() {
                self.edit(len_chars..len_chars, &format!("\n{}", lines.join("\n")));
            }
            return;
        }

        let start_char = self.rope.line_to_char(start);
        if end < line_count {
            let mut text = lines.join("\n");
            if !lines.is_empty() {
                text.push('\n');
            }
            self.edit(start_char..self.rope.line_to_char(end), &text);
        } else if lines.is_empty() {
            // The last line has no terminator: take the preceding one instead
            self.edit(start_char.saturating_sub(1)..len_chars, "");
        } else {
            self.edit(start_char..len_chars, &lines.join("\n"));
        }
    }

    fn cursor_position(&self) -> Position {
        self.selection.head
    }

    fn set_cursor_position(&mut self, pos: Position) {
        self.selection = Selection::collapsed(pos);
    }

    fn set_selection_range(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Rows inside fenced code blocks are not tables
    fn accepts_table_edit(&self, row: usize) -> bool {
        let fenced = self.fenced.get_or_init(|| {
            let lines: Vec<String> = (0..self.rope.len_lines()).map(|r| self.line(r)).collect();
            fenced_lines(lines.iter().map(String::as_str))
        });
        !fenced.get(row).copied().unwrap_or(false)
    }

    fn has_multiple_cursors(&self) -> bool {
        self.multiple_cursors
    }

    fn transact(&mut self, f: &mut dyn FnMut(&mut Self)) {
        if self.pending.is_some() {
            f(self);
            return;
        }
        self.pending = Some(Transaction::new(self.selection));
        f(self);
        if let Some(mut transaction) = self.pending.take() {
            if !transaction.is_empty() {
                transaction.selection_after = self.selection;
                self.history.push(transaction);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_line_and_last_row() {
        let editor = RopeEditor::from_text("a\nb\r\nc");
        assert_eq!(editor.line(0), "a");
        assert_eq!(editor.line(1), "b");
        assert_eq!(editor.line(2), "c");
        assert_eq!(editor.line(3), "");
        assert_eq!(editor.last_row(), 2);

        let trailing = RopeEditor::from_text("a\n");
        assert_eq!(trailing.last_row(), 1);
        assert_eq!(trailing.line(1), "");
    }

    #[test]
    fn test_replace_lines_middle() {
        let mut editor = RopeEditor::from_text("a\nb\nc\n");
        editor.replace_lines(1, 2, &lines(&["x", "y"]));
        assert_eq!(editor.text(), "a\nx\ny\nc\n");
    }

    #[test]
    fn test_replace_lines_through_last_line() {
        let mut editor = RopeEditor::from_text("a\nb");
        editor.replace_lines(1, 2, &lines(&["x", "y"]));
        assert_eq!(editor.text(), "a\nx\ny");
    }

    #[test]
    fn test_insert_line_past_end() {
        let mut editor = RopeEditor::from_text("a\nb");
        editor.insert_line(2, "c");
        assert_eq!(editor.text(), "a\nb\nc");

        let mut editor = RopeEditor::from_text("a\n");
        editor.insert_line(1, "b");
        assert_eq!(editor.text(), "a\nb\n");
    }

    #[test]
    fn test_delete_line() {
        let mut editor = RopeEditor::from_text("a\nb\nc");
        editor.delete_line(1);
        assert_eq!(editor.text(), "a\nc");
        editor.delete_line(1);
        assert_eq!(editor.text(), "a");
        editor.delete_line(0);
        assert_eq!(editor.text(), "");
    }

    #[test]
    fn test_transaction_is_one_undo_step() {
        let mut editor = RopeEditor::from_text("a\nb\nc\n").with_cursor(Position::new(1, 0));
        editor.transact(&mut |ed| {
            ed.replace_lines(0, 1, &lines(&["A"]));
            ed.replace_lines(2, 3, &lines(&["C"]));
            ed.set_cursor_position(Position::new(2, 1));
        });
        assert_eq!(editor.text(), "A\nb\nC\n");
        assert!(editor.can_undo());

        assert!(editor.undo());
        assert_eq!(editor.text(), "a\nb\nc\n");
        assert_eq!(editor.cursor_position(), Position::new(1, 0));
        assert!(!editor.can_undo());

        assert!(editor.redo());
        assert_eq!(editor.text(), "A\nb\nC\n");
        assert_eq!(editor.cursor_position(), Position::new(2, 1));
    }

    #[test]
    fn test_empty_transaction_not_recorded() {
        let mut editor = RopeEditor::from_text("a\n");
        editor.transact(&mut |ed| ed.replace_lines(0, 1, &lines(&["a"])));
        assert!(!editor.can_undo());
        assert!(!editor.undo());
    }

    #[test]
    fn test_accepts_table_edit_outside_fences() {
        let editor = RopeEditor::from_text("| a |\n```\n| b |\n```\n| c |\n");
        assert!(editor.accepts_table_edit(0));
        assert!(!editor.accepts_table_edit(1));
        assert!(!editor.accepts_table_edit(2));
        assert!(!editor.accepts_table_edit(3));
        assert!(editor.accepts_table_edit(4));
    }

    #[test]
    fn test_fence_closes_only_on_matching_marker() {
        let editor = RopeEditor::from_text("```\n~~~\n| a |\n```\n| b |\n");
        assert!(!editor.accepts_table_edit(1));
        assert!(!editor.accepts_table_edit(2));
        assert!(!editor.accepts_table_edit(3));
        assert!(editor.accepts_table_edit(4));

        let editor = RopeEditor::from_text("````\n```\n| a |\n````\n| b |\n");
        assert!(!editor.accepts_table_edit(2));
        assert!(editor.accepts_table_edit(4));
    }

    #[test]
    fn test_fence_map_follows_edits() {
        let mut editor = RopeEditor::from_text("| a |\n| b |\n");
        assert!(editor.accepts_table_edit(1));
        editor.insert_line(1, "~~~");
        assert!(!editor.accepts_table_edit(2));
        assert!(editor.undo());
        assert!(editor.accepts_table_edit(1));
    }

    #[test]
    fn test_unicode_separators_are_not_line_breaks() {
        let editor = RopeEditor::from_text("a\u{2028}b\u{85}c\u{c}d\n");
        assert_eq!(editor.last_row(), 1);
        assert_eq!(editor.line(0), "a\u{2028}b\u{85}c\u{c}d");
    }

    #[test]
    fn test_selection() {
        let mut editor = RopeEditor::from_text("hello");
        let sel = Selection::new(Position::new(0, 1), Position::new(0, 4));
        editor.set_selection_range(sel);
        assert_eq!(editor.selection(), sel);
        assert_eq!(editor.cursor_position(), Position::new(0, 4));
    }
}
