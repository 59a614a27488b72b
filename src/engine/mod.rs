//! Table command engine
//!
//! Every command follows the same shape: locate the table around the
//! cursor, compute the focus, complete the table, apply the command's
//! edit, format, then write the changed lines and place the cursor in a
//! single transaction. Tables are rebuilt from the buffer on every call.

mod smart_cursor;

pub use smart_cursor::SmartCursor;

use serde::Serialize;

use crate::commands::TableCommand;
use crate::config::TableOptions;
use crate::editable::{Position, TextEditor};
use crate::table::{
    complete_table, compute_focus, compute_position, compute_selection_range, edit,
    format_table, is_table_row, read_table, Alignment, Completed, Focus, Formatted, Row, Table,
};
use crate::util::char_len;

/// Result of running a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandOutcome {
    Applied,
    /// The cursor is not on a table row; nothing changed
    NoTable,
}

/// A table found in the buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRange {
    pub table: Table,
    /// First buffer row of the table
    pub start_row: usize,
    /// Last buffer row of the table (inclusive)
    pub end_row: usize,
    /// The table's lines as they were read
    pub lines: Vec<String>,
}

fn is_table_line<E: TextEditor + ?Sized>(editor: &E, row: usize, options: &TableOptions) -> bool {
    editor.accepts_table_edit(row) && is_table_row(&editor.line(row), &options.left_margin_chars)
}

/// Find the table containing buffer row `row`
pub fn find_table_at<E: TextEditor + ?Sized>(
    editor: &E,
    row: usize,
    options: &TableOptions,
) -> Option<TableRange> {
    let last_row = editor.last_row();
    if row > last_row || !is_table_line(editor, row, options) {
        return None;
    }

    let mut start_row = row;
    while start_row > 0 && is_table_line(editor, start_row - 1, options) {
        start_row -= 1;
    }
    let mut end_row = row;
    while end_row < last_row && is_table_line(editor, end_row + 1, options) {
        end_row += 1;
    }

    let lines: Vec<String> = (start_row..=end_row).map(|r| editor.line(r)).collect();
    let table = read_table(&lines, &options.left_margin_chars);
    Some(TableRange {
        table,
        start_row,
        end_row,
        lines,
    })
}

/// Find the table under the cursor
pub fn find_table<E: TextEditor + ?Sized>(editor: &E, options: &TableOptions) -> Option<TableRange> {
    find_table_at(editor, editor.cursor_position().line, options)
}

/// Replace `old` with `new` starting at `start_row`, touching only the
/// span of lines that differ. Nothing is written when they are equal.
pub fn update_lines<E: TextEditor + ?Sized>(
    editor: &mut E,
    start_row: usize,
    old: &[String],
    new: &[String],
) {
    let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
    if prefix == old.len() && prefix == new.len() {
        return;
    }
    let max_suffix = old.len().min(new.len()) - prefix;
    let suffix = old
        .iter()
        .rev()
        .zip(new.iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();

    tracing::trace!(
        start = start_row + prefix,
        end = start_row + old.len() - suffix,
        lines = new.len() - prefix - suffix,
        "replacing lines"
    );
    editor.replace_lines(
        start_row + prefix,
        start_row + old.len() - suffix,
        &new[prefix..new.len() - suffix],
    );
}

/// Intra-cell offset of `focus` after formatting.
///
/// A cell the focus moved into starts at its content; otherwise the
/// content offset is carried over, clamped to the new content.
fn compute_new_offset(focus: Focus, table: &Table, formatted: &Formatted, moved: bool) -> usize {
    let Ok(column) = usize::try_from(focus.column) else {
        return char_len(&formatted.margin_left);
    };
    let Some(formatted_cell) = formatted.table.cell(focus.row, column) else {
        return 0;
    };
    if moved {
        return formatted_cell.compute_raw_offset(0);
    }
    let content_offset = table
        .cell(focus.row, column)
        .map(|cell| cell.compute_content_offset(focus.offset))
        .unwrap_or(0)
        .min(char_len(formatted_cell.content()));
    formatted_cell.compute_raw_offset(content_offset)
}

/// Put the cursor on `focus`, selecting the cell content when `select`
/// is set and the cell has any.
fn place_focus<E: TextEditor + ?Sized>(
    editor: &mut E,
    table: &Table,
    start_row: usize,
    focus: Focus,
    select: bool,
) {
    if select {
        if let Some(selection) = compute_selection_range(table, start_row, focus) {
            editor.set_selection_range(selection);
            return;
        }
    }
    let pos = compute_position(table, start_row, focus).unwrap_or(Position::new(start_row, 0));
    editor.set_cursor_position(pos);
}

/// State shared by the steps of one command
struct Session {
    range: TableRange,
    /// Completed table
    table: Table,
    alignment_inserted: bool,
    /// Focus in completed-table coordinates
    focus: Focus,
}

impl Session {
    fn open<E: TextEditor + ?Sized>(editor: &E, options: &TableOptions) -> Option<Self> {
        let range = find_table(editor, options)?;
        let focus = compute_focus(&range.table, range.start_row, editor.cursor_position());
        let Completed {
            table,
            alignment_inserted,
        } = complete_table(&range.table, options);
        let focus = if alignment_inserted && focus.row > 0 {
            focus.with_row(focus.row + 1)
        } else {
            focus
        };
        Some(Self {
            range,
            table,
            alignment_inserted,
            focus,
        })
    }

    fn start_row(&self) -> usize {
        self.range.start_row
    }

    fn header_width(&self) -> usize {
        self.table.header_width()
    }

    /// Format `table`, write it back and place the cursor on `focus`.
    /// Returns the focus that was placed.
    fn commit<E: TextEditor>(
        &self,
        editor: &mut E,
        table: &Table,
        focus: Focus,
        moved: bool,
        select: bool,
        options: &TableOptions,
    ) -> Focus {
        let formatted = format_table(table, options);
        let focus = focus.with_offset(compute_new_offset(focus, table, &formatted, moved));
        let lines = formatted.table.to_lines();
        let start_row = self.start_row();
        editor.transact(&mut |ed| {
            update_lines(ed, start_row, &self.range.lines, &lines);
            place_focus(ed, &formatted.table, start_row, focus, select);
        });
        focus
    }

    /// Format without any edit, keeping the cursor in its cell
    fn reformat<E: TextEditor>(&self, editor: &mut E, options: &TableOptions) -> Focus {
        self.commit(editor, &self.table, self.focus, false, false, options)
    }
}

/// Clamp an `isize` column into `0..width`
fn clamp_column(column: isize, width: usize) -> isize {
    column.clamp(0, (width as isize - 1).max(0))
}

/// Table editing commands over a [`TextEditor`].
///
/// The only state kept between commands is the smart cursor.
#[derive(Debug, Clone, Default)]
pub struct TableEditor {
    smart_cursor: SmartCursor,
}

impl TableEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn smart_cursor(&self) -> &SmartCursor {
        &self.smart_cursor
    }

    /// Forget the smart cursor column (call after moving the cursor yourself)
    pub fn reset_smart_cursor(&mut self) {
        self.smart_cursor.reset();
    }

    /// Whether table commands should be offered at the cursor: a single
    /// cursor on an editable table row.
    pub fn cursor_is_in_table<E: TextEditor + ?Sized>(
        &self,
        editor: &E,
        options: &TableOptions,
    ) -> bool {
        !editor.has_multiple_cursors()
            && is_table_line(editor, editor.cursor_position().line, options)
    }

    /// Run a command by value
    pub fn execute<E: TextEditor>(
        &mut self,
        editor: &mut E,
        command: TableCommand,
        options: &TableOptions,
    ) -> CommandOutcome {
        match command {
            TableCommand::Format => self.format(editor, options),
            TableCommand::FormatAll => {
                if self.format_all(editor, options) > 0 {
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::NoTable
                }
            }
            TableCommand::Escape => self.escape(editor, options),
            TableCommand::Align(alignment) => self.align(editor, alignment, options),
            TableCommand::SelectCell => self.select_cell(editor, options),
            TableCommand::MoveFocus { rows, columns } => {
                self.move_focus(editor, rows, columns, options)
            }
            TableCommand::NextCell => self.next_cell(editor, options),
            TableCommand::PreviousCell => self.previous_cell(editor, options),
            TableCommand::NextRow => self.next_row(editor, options),
            TableCommand::InsertRow => self.insert_row(editor, options),
            TableCommand::DeleteRow => self.delete_row(editor, options),
            TableCommand::MoveRow(offset) => self.move_row(editor, offset, options),
            TableCommand::InsertColumn => self.insert_column(editor, options),
            TableCommand::DeleteColumn => self.delete_column(editor, options),
            TableCommand::MoveColumn(offset) => self.move_column(editor, offset, options),
        }
    }

    /// Open a session, or reset the smart cursor and report `NoTable`
    fn session<E: TextEditor>(
        &mut self,
        editor: &E,
        command: &'static str,
        options: &TableOptions,
    ) -> Option<Session> {
        match Session::open(editor, options) {
            Some(session) => {
                tracing::debug!(
                    command,
                    start_row = session.range.start_row,
                    end_row = session.range.end_row,
                    row = session.focus.row,
                    column = session.focus.column,
                    "running table command"
                );
                Some(session)
            }
            None => {
                tracing::debug!(command, "cursor is not in a table");
                self.smart_cursor.reset();
                None
            }
        }
    }

    /// Session for commands that end a smart cursor run
    fn plain_session<E: TextEditor>(
        &mut self,
        editor: &E,
        command: &'static str,
        options: &TableOptions,
    ) -> Option<Session> {
        self.smart_cursor.reset();
        self.session(editor, command, options)
    }

    /// Session for next-cell / next-row: drops stale smart cursor memory
    fn smart_session<E: TextEditor>(
        &mut self,
        editor: &E,
        command: &'static str,
        options: &TableOptions,
    ) -> Option<Session> {
        let session = self.session(editor, command, options)?;
        if options.smart_cursor {
            self.smart_cursor
                .invalidate_stale(session.start_row(), &session.focus);
        } else {
            self.smart_cursor.reset();
        }
        Some(session)
    }

    /// Column a row transition lands on
    fn row_start_column(&self, width: usize) -> isize {
        self.smart_cursor
            .column()
            .map(|column| clamp_column(column as isize, width))
            .unwrap_or(0)
    }

    fn record_smart_cursor(&mut self, session: &Session, options: &TableOptions, new_focus: Focus) {
        if !options.smart_cursor {
            return;
        }
        let width = session.header_width();
        let start_column = usize::try_from(session.focus.column)
            .ok()
            .filter(|&column| column < width)
            .unwrap_or(0);
        self.smart_cursor
            .record(session.start_row(), start_column, new_focus);
    }

    /// Format the table, keeping the cursor in its cell
    pub fn format<E: TextEditor>(&mut self, editor: &mut E, options: &TableOptions) -> CommandOutcome {
        let Some(session) = self.plain_session(editor, "format", options) else {
            return CommandOutcome::NoTable;
        };
        session.reformat(editor, options);
        CommandOutcome::Applied
    }

    /// Format every table in the buffer. Returns how many were found.
    pub fn format_all<E: TextEditor>(&mut self, editor: &mut E, options: &TableOptions) -> usize {
        self.smart_cursor.reset();
        let mut count = 0;
        editor.transact(&mut |ed| {
            let mut cursor = ed.cursor_position();
            let mut row = 0;
            while row <= ed.last_row() {
                let Some(range) = find_table_at(ed, row, options) else {
                    row += 1;
                    continue;
                };
                let Completed {
                    table,
                    alignment_inserted,
                } = complete_table(&range.table, options);
                let formatted = format_table(&table, options);
                let lines = formatted.table.to_lines();

                if (range.start_row..=range.end_row).contains(&cursor.line) {
                    let focus = compute_focus(&range.table, range.start_row, cursor);
                    let focus = if alignment_inserted && focus.row > 0 {
                        focus.with_row(focus.row + 1)
                    } else {
                        focus
                    };
                    let focus =
                        focus.with_offset(compute_new_offset(focus, &table, &formatted, false));
                    if let Some(pos) = compute_position(&formatted.table, range.start_row, focus) {
                        cursor = pos;
                    }
                } else if cursor.line > range.end_row {
                    cursor.line = (cursor.line + lines.len()).saturating_sub(range.lines.len());
                }

                update_lines(ed, range.start_row, &range.lines, &lines);
                row = range.start_row + lines.len();
                count += 1;
            }
            ed.set_cursor_position(cursor);
        });
        tracing::debug!(tables = count, "formatted all tables");
        count
    }

    /// Format the table and move the cursor to the line after it
    pub fn escape<E: TextEditor>(&mut self, editor: &mut E, options: &TableOptions) -> CommandOutcome {
        let Some(session) = self.plain_session(editor, "escape", options) else {
            return CommandOutcome::NoTable;
        };
        let formatted = format_table(&session.table, options);
        let lines = formatted.table.to_lines();
        let row = session.range.end_row + if session.alignment_inserted { 2 } else { 1 };
        editor.transact(&mut |ed| {
            update_lines(ed, session.start_row(), &session.range.lines, &lines);
            if row > ed.last_row() {
                ed.insert_line(row, "");
            }
            ed.set_cursor_position(Position::new(row, 0));
        });
        CommandOutcome::Applied
    }

    /// Set the alignment of the focused column
    pub fn align<E: TextEditor>(
        &mut self,
        editor: &mut E,
        alignment: Alignment,
        options: &TableOptions,
    ) -> CommandOutcome {
        let Some(session) = self.plain_session(editor, "align", options) else {
            return CommandOutcome::NoTable;
        };
        let table = match usize::try_from(session.focus.column) {
            Ok(column) if column < session.header_width() => edit::alter_alignment(
                &session.table,
                column,
                alignment,
                options.min_content_width,
            ),
            _ => session.table.clone(),
        };
        session.commit(editor, &table, session.focus, false, false, options);
        CommandOutcome::Applied
    }

    /// Format and select the focused cell's content
    pub fn select_cell<E: TextEditor>(
        &mut self,
        editor: &mut E,
        options: &TableOptions,
    ) -> CommandOutcome {
        let Some(session) = self.plain_session(editor, "select_cell", options) else {
            return CommandOutcome::NoTable;
        };
        session.commit(editor, &session.table, session.focus, false, true, options);
        CommandOutcome::Applied
    }

    /// Move the focus by rows and columns, skipping the alignment row
    pub fn move_focus<E: TextEditor>(
        &mut self,
        editor: &mut E,
        rows: isize,
        columns: isize,
        options: &TableOptions,
    ) -> CommandOutcome {
        let Some(session) = self.plain_session(editor, "move_focus", options) else {
            return CommandOutcome::NoTable;
        };
        let mut focus = session.focus;

        if rows != 0 {
            let height = session.table.height() as isize;
            let row = focus.row as isize;
            let skip = if row < 1 && row + rows >= 1 {
                1
            } else if row > 1 && row + rows <= 1 {
                -1
            } else {
                0
            };
            let max_row = if height <= 2 { 0 } else { height - 1 };
            focus = focus.with_row((row + rows + skip).clamp(0, max_row) as usize);
        }

        if columns != 0 {
            let width = session.header_width() as isize;
            let leaving_left = focus.column < 0 && columns < 0;
            let leaving_right = focus.column >= width && columns > 0;
            if !leaving_left && !leaving_right {
                focus = focus.with_column(clamp_column(focus.column + columns, width as usize));
            }
        }

        let moved = !focus.same_cell(&session.focus);
        session.commit(editor, &session.table, focus, moved, moved, options);
        CommandOutcome::Applied
    }

    /// Select the next cell, adding a column or row when running off the table
    pub fn next_cell<E: TextEditor>(&mut self, editor: &mut E, options: &TableOptions) -> CommandOutcome {
        let Some(session) = self.smart_session(editor, "next_cell", options) else {
            return CommandOutcome::NoTable;
        };
        let focus = session.focus;
        let width = session.header_width();
        let height = session.table.height();
        let row_start = self.row_start_column(width);

        let (table, new_focus) = if focus.row == 1 {
            let table = if height <= 2 {
                edit::insert_row(&session.table, 2, Row::empty(width))
            } else {
                session.table.clone()
            };
            (table, Focus::new(2, row_start, 0))
        } else if focus.column + 1 < width as isize {
            (session.table.clone(), focus.with_column(focus.column + 1))
        } else if focus.row == 0 {
            let table = edit::insert_column(&session.table, width, options.min_content_width);
            (table, Focus::new(0, width as isize, 0))
        } else {
            let row = focus.row + 1;
            let table = if row >= height {
                edit::insert_row(&session.table, row, Row::empty(width))
            } else {
                session.table.clone()
            };
            (table, Focus::new(row, row_start, 0))
        };

        let placed = session.commit(editor, &table, new_focus, true, true, options);
        self.record_smart_cursor(&session, options, placed);
        CommandOutcome::Applied
    }

    /// Select the previous cell, wrapping to the end of the previous row
    pub fn previous_cell<E: TextEditor>(
        &mut self,
        editor: &mut E,
        options: &TableOptions,
    ) -> CommandOutcome {
        let Some(session) = self.plain_session(editor, "previous_cell", options) else {
            return CommandOutcome::NoTable;
        };
        let width = session.header_width() as isize;
        let focus = session.focus;
        // The right margin comes right after the last column
        let column = focus.column.min(width);

        let new_focus = if focus.row == 0 {
            focus.with_column((column - 1).max(0))
        } else if focus.row == 1 {
            Focus::new(0, width - 1, 0)
        } else if column > 0 {
            focus.with_column(column - 1)
        } else if focus.row == 2 {
            Focus::new(0, width - 1, 0)
        } else {
            Focus::new(focus.row - 1, width - 1, 0)
        };

        let moved = !new_focus.same_cell(&focus);
        session.commit(editor, &session.table, new_focus, moved, moved, options);
        CommandOutcome::Applied
    }

    /// Select the first cell (or the smart cursor column) of the next row
    pub fn next_row<E: TextEditor>(&mut self, editor: &mut E, options: &TableOptions) -> CommandOutcome {
        let Some(session) = self.smart_session(editor, "next_row", options) else {
            return CommandOutcome::NoTable;
        };
        let width = session.header_width();
        let row = if session.focus.row <= 1 {
            2
        } else {
            session.focus.row + 1
        };
        let table = if row >= session.table.height() {
            edit::insert_row(&session.table, row, Row::empty(width))
        } else {
            session.table.clone()
        };
        let new_focus = Focus::new(row, self.row_start_column(width), 0);

        let placed = session.commit(editor, &table, new_focus, true, true, options);
        self.record_smart_cursor(&session, options, placed);
        CommandOutcome::Applied
    }

    /// Insert an empty body row below the focus
    pub fn insert_row<E: TextEditor>(&mut self, editor: &mut E, options: &TableOptions) -> CommandOutcome {
        let Some(session) = self.plain_session(editor, "insert_row", options) else {
            return CommandOutcome::NoTable;
        };
        let row = (session.focus.row + 1).max(2);
        let table = edit::insert_row(&session.table, row, Row::empty(session.header_width()));
        session.commit(editor, &table, Focus::new(row, 0, 0), true, false, options);
        CommandOutcome::Applied
    }

    /// Delete the focused body row
    pub fn delete_row<E: TextEditor>(&mut self, editor: &mut E, options: &TableOptions) -> CommandOutcome {
        let Some(session) = self.plain_session(editor, "delete_row", options) else {
            return CommandOutcome::NoTable;
        };
        let focus = session.focus;
        if focus.row < 2 {
            session.reformat(editor, options);
            return CommandOutcome::Applied;
        }

        let table = edit::delete_row(&session.table, focus.row);
        let height = table.height();
        let row = if focus.row < height {
            focus.row
        } else if height > 2 {
            height - 1
        } else {
            0
        };
        session.commit(editor, &table, focus.with_row(row), true, false, options);
        CommandOutcome::Applied
    }

    /// Swap the focused body row with the one `offset` rows away
    pub fn move_row<E: TextEditor>(
        &mut self,
        editor: &mut E,
        offset: isize,
        options: &TableOptions,
    ) -> CommandOutcome {
        let Some(session) = self.plain_session(editor, "move_row", options) else {
            return CommandOutcome::NoTable;
        };
        let focus = session.focus;
        let target = focus.row as isize + offset;
        let height = session.table.height() as isize;
        if focus.row < 2 || target < 2 || target >= height {
            session.reformat(editor, options);
            return CommandOutcome::Applied;
        }

        let target = target as usize;
        let table = edit::move_row(&session.table, focus.row, target);
        session.commit(editor, &table, focus.with_row(target), false, false, options);
        CommandOutcome::Applied
    }

    /// Insert an empty column after the focused one
    pub fn insert_column<E: TextEditor>(
        &mut self,
        editor: &mut E,
        options: &TableOptions,
    ) -> CommandOutcome {
        let Some(session) = self.plain_session(editor, "insert_column", options) else {
            return CommandOutcome::NoTable;
        };
        let width = session.header_width() as isize;
        let focus = session.focus;
        let column = if focus.column < 0 {
            0
        } else if focus.column >= width {
            width
        } else {
            focus.column + 1
        };
        let table = edit::insert_column(&session.table, column as usize, options.min_content_width);
        let row = if focus.row == 1 { 0 } else { focus.row };
        session.commit(editor, &table, Focus::new(row, column, 0), true, false, options);
        CommandOutcome::Applied
    }

    /// Delete the focused column (a table always keeps one)
    pub fn delete_column<E: TextEditor>(
        &mut self,
        editor: &mut E,
        options: &TableOptions,
    ) -> CommandOutcome {
        let Some(session) = self.plain_session(editor, "delete_column", options) else {
            return CommandOutcome::NoTable;
        };
        let focus = session.focus;
        let column = match usize::try_from(focus.column) {
            Ok(column) if column < session.header_width() => column,
            _ => {
                session.reformat(editor, options);
                return CommandOutcome::Applied;
            }
        };

        let table = edit::delete_column(&session.table, column, options.min_content_width);
        let new_column = clamp_column(column as isize, table.header_width());
        session.commit(editor, &table, focus.with_column(new_column), true, false, options);
        CommandOutcome::Applied
    }

    /// Swap the focused column with the one `offset` columns away
    pub fn move_column<E: TextEditor>(
        &mut self,
        editor: &mut E,
        offset: isize,
        options: &TableOptions,
    ) -> CommandOutcome {
        let Some(session) = self.plain_session(editor, "move_column", options) else {
            return CommandOutcome::NoTable;
        };
        let focus = session.focus;
        let width = session.header_width() as isize;
        let target = focus.column + offset;
        if focus.column < 0 || focus.column >= width || target < 0 || target >= width {
            session.reformat(editor, options);
            return CommandOutcome::Applied;
        }

        let table = edit::move_column(&session.table, focus.column as usize, target as usize);
        session.commit(editor, &table, focus.with_column(target), false, false, options);
        CommandOutcome::Applied
    }
}
