//! Mapping between buffer positions and table focus
//!
//! A focus addresses a region of a row: column `-1` is the left margin,
//! `0..width` are cells and anything past the last cell is the right
//! margin. `offset` is a character offset inside that region.

use crate::editable::{Position, Selection};
use crate::util::char_len;

use super::model::{Cell, Row, Table};

/// Logical cursor location relative to a table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Focus {
    pub row: usize,
    pub column: isize,
    pub offset: usize,
}

impl Focus {
    pub const fn new(row: usize, column: isize, offset: usize) -> Self {
        Self {
            row,
            column,
            offset,
        }
    }

    pub fn with_row(self, row: usize) -> Self {
        Self { row, ..self }
    }

    pub fn with_column(self, column: isize) -> Self {
        Self { column, ..self }
    }

    pub fn with_offset(self, offset: usize) -> Self {
        Self { offset, ..self }
    }

    /// Same row and column, ignoring the offset
    pub fn same_cell(&self, other: &Focus) -> bool {
        self.row == other.row && self.column == other.column
    }

    /// The focused cell, if the focus addresses one
    pub fn cell<'a>(&self, table: &'a Table) -> Option<&'a Cell> {
        let column = usize::try_from(self.column).ok()?;
        table.cell(self.row, column)
    }
}

/// Column just past the first pipe of `row`
fn cells_start(row: &Row) -> usize {
    char_len(&row.margin_left) + 1
}

/// Column where cell `column` begins (past its leading pipe)
fn cell_start(row: &Row, column: usize) -> usize {
    cells_start(row)
        + row
            .cells
            .iter()
            .take(column)
            .map(|cell| char_len(&cell.raw) + 1)
            .sum::<usize>()
}

/// Compute the focus for a buffer position.
///
/// Positions outside the table fall back to `Focus(0, 0, 0)`.
pub fn compute_focus(table: &Table, start_row: usize, pos: Position) -> Focus {
    let Some((focus_row, row)) = pos
        .line
        .checked_sub(start_row)
        .and_then(|index| table.row(index).map(|row| (index, row)))
    else {
        return Focus::default();
    };

    let start = cells_start(row);
    if pos.column < start {
        return Focus::new(focus_row, -1, pos.column);
    }

    let mut end = start;
    let mut offset = pos.column - start;
    let mut column = 0;
    for cell in &row.cells {
        let width = char_len(&cell.raw) + 1;
        end += width;
        if end > pos.column {
            break;
        }
        offset -= width;
        column += 1;
    }

    tracing::trace!(
        line = pos.line,
        col = pos.column,
        focus_row,
        column,
        offset,
        "computed focus"
    );
    Focus::new(focus_row, column, offset)
}

/// Compute the buffer position of a focus, or `None` if its row is missing
pub fn compute_position(table: &Table, start_row: usize, focus: Focus) -> Option<Position> {
    let row = table.row(focus.row)?;
    let line = start_row + focus.row;
    match usize::try_from(focus.column) {
        Err(_) => Some(Position::new(line, focus.offset)),
        Ok(column) => Some(Position::new(
            line,
            cell_start(row, column) + focus.offset,
        )),
    }
}

/// The trimmed content span of the focused cell.
///
/// `None` for margins, missing rows and cells without content.
pub fn compute_selection_range(
    table: &Table,
    start_row: usize,
    focus: Focus,
) -> Option<Selection> {
    let row = table.row(focus.row)?;
    let column = usize::try_from(focus.column).ok()?;
    let cell = row.cell(column)?;
    let content = cell.content();
    if content.is_empty() {
        return None;
    }

    let line = start_row + focus.row;
    let start = cell_start(row, column) + cell.compute_raw_offset(0);
    let end = start + char_len(content);
    Some(Selection::new(
        Position::new(line, start),
        Position::new(line, end),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::new(vec![
            Row::new(vec![Cell::new(" foo "), Cell::new(" bar ")], "", " "),
            Row::new(vec![Cell::new(" baz ")], "  ", "   "),
        ])
    }

    fn focus_at(line: usize, column: usize) -> (usize, isize, usize) {
        let f = compute_focus(&table(), 10, Position::new(line, column));
        (f.row, f.column, f.offset)
    }

    #[test]
    fn test_compute_focus_out_of_range() {
        assert_eq!(focus_at(9, 0), (0, 0, 0));
        assert_eq!(focus_at(12, 0), (0, 0, 0));
    }

    #[test]
    fn test_compute_focus_header_row() {
        assert_eq!(focus_at(10, 0), (0, -1, 0));
        assert_eq!(focus_at(10, 1), (0, 0, 0));
        assert_eq!(focus_at(10, 6), (0, 0, 5));
        assert_eq!(focus_at(10, 7), (0, 1, 0));
        assert_eq!(focus_at(10, 12), (0, 1, 5));
        assert_eq!(focus_at(10, 13), (0, 2, 0));
        assert_eq!(focus_at(10, 14), (0, 2, 1));
    }

    #[test]
    fn test_compute_focus_indented_row() {
        assert_eq!(focus_at(11, 0), (1, -1, 0));
        assert_eq!(focus_at(11, 2), (1, -1, 2));
        assert_eq!(focus_at(11, 3), (1, 0, 0));
        assert_eq!(focus_at(11, 8), (1, 0, 5));
        assert_eq!(focus_at(11, 9), (1, 1, 0));
        assert_eq!(focus_at(11, 12), (1, 1, 3));
    }

    #[test]
    fn test_compute_position() {
        let t = table();
        let pos = |row, column, offset| compute_position(&t, 10, Focus::new(row, column, offset));

        assert_eq!(pos(0, -1, 0), Some(Position::new(10, 0)));
        assert_eq!(pos(0, 0, 0), Some(Position::new(10, 1)));
        assert_eq!(pos(0, 0, 5), Some(Position::new(10, 6)));
        assert_eq!(pos(0, 1, 0), Some(Position::new(10, 7)));
        assert_eq!(pos(0, 1, 5), Some(Position::new(10, 12)));
        assert_eq!(pos(0, 2, 0), Some(Position::new(10, 13)));
        assert_eq!(pos(0, 2, 1), Some(Position::new(10, 14)));
        assert_eq!(pos(1, -1, 2), Some(Position::new(11, 2)));
        assert_eq!(pos(1, 0, 0), Some(Position::new(11, 3)));
        assert_eq!(pos(1, 0, 5), Some(Position::new(11, 8)));
        assert_eq!(pos(1, 2, 0), Some(Position::new(11, 9)));
        assert_eq!(pos(1, 2, 3), Some(Position::new(11, 12)));
        assert_eq!(pos(2, 0, 0), None);
    }

    #[test]
    fn test_compute_selection_range() {
        let t = table();
        let range = |row, column, offset| {
            compute_selection_range(&t, 10, Focus::new(row, column, offset))
                .map(|s| (s.start().line, s.start().column, s.end().column))
        };

        assert_eq!(range(0, 0, 0), Some((10, 2, 5)));
        assert_eq!(range(0, 0, 5), Some((10, 2, 5)));
        assert_eq!(range(0, 1, 0), Some((10, 8, 11)));
        assert_eq!(range(1, 0, 0), Some((11, 4, 7)));
    }

    #[test]
    fn test_compute_selection_range_margins_and_missing() {
        let t = table();
        let range = |row, column| compute_selection_range(&t, 10, Focus::new(row, column, 0));

        assert_eq!(range(0, -1), None);
        assert_eq!(range(0, 2), None);
        assert_eq!(range(1, -1), None);
        assert_eq!(range(1, 2), None);
        assert_eq!(range(2, 0), None);
    }

    #[test]
    fn test_compute_selection_range_empty_cell() {
        let t = Table::new(vec![Row::new(vec![Cell::new("   ")], "", "")]);
        assert_eq!(compute_selection_range(&t, 0, Focus::new(0, 0, 0)), None);
    }

    #[test]
    fn test_focus_inverse() {
        let t = table();
        for focus in [
            Focus::new(0, -1, 0),
            Focus::new(0, 0, 3),
            Focus::new(0, 1, 5),
            Focus::new(0, 2, 1),
            Focus::new(1, -1, 1),
            Focus::new(1, 0, 2),
            Focus::new(1, 1, 2),
        ] {
            let pos = compute_position(&t, 4, focus).unwrap();
            assert_eq!(compute_focus(&t, 4, pos), focus);
        }
    }

    #[test]
    fn test_focus_helpers() {
        let t = table();
        let focus = Focus::new(0, 1, 3);
        assert_eq!(focus.cell(&t).unwrap().raw, " bar ");
        assert!(focus.with_offset(0).same_cell(&focus));
        assert!(!focus.with_column(0).same_cell(&focus));
        assert!(Focus::new(0, -1, 0).cell(&t).is_none());
    }
}
