//! Structural edits on tables
//!
//! Every function takes a table by reference and builds a new one. Indices
//! out of range leave the table unchanged.

use super::model::{Alignment, Cell, Row, Table};

/// Insert `row` at `index` (clamped to the table height)
pub fn insert_row(table: &Table, index: usize, row: Row) -> Table {
    let mut rows = table.rows().to_vec();
    rows.insert(index.min(rows.len()), row);
    Table::new(rows)
}

/// Remove the row at `index`
pub fn delete_row(table: &Table, index: usize) -> Table {
    let mut rows = table.rows().to_vec();
    if index < rows.len() {
        rows.remove(index);
    }
    Table::new(rows)
}

/// Swap the rows at `a` and `b`
pub fn move_row(table: &Table, a: usize, b: usize) -> Table {
    let mut rows = table.rows().to_vec();
    if a < rows.len() && b < rows.len() {
        rows.swap(a, b);
    }
    Table::new(rows)
}

fn map_rows(table: &Table, mut f: impl FnMut(usize, &Row) -> Row) -> Table {
    Table::new(
        table
            .rows()
            .iter()
            .enumerate()
            .map(|(index, row)| f(index, row))
            .collect(),
    )
}

/// Insert an empty column at `index` in every row.
///
/// The alignment row, if present, gets a default delimiter cell.
pub fn insert_column(table: &Table, index: usize, min_content_width: usize) -> Table {
    let has_alignment_row = table.has_alignment_row();
    map_rows(table, |row_index, row| {
        let cell = if row_index == 1 && has_alignment_row {
            Cell::delimiter(Alignment::Default, min_content_width)
        } else {
            Cell::empty()
        };
        let mut row = row.clone();
        row.cells.insert(index.min(row.cells.len()), cell);
        row
    })
}

/// Remove the column at `index` from every row.
///
/// A table never ends up without columns: when the last column goes, a
/// single empty column takes its place.
pub fn delete_column(table: &Table, index: usize, min_content_width: usize) -> Table {
    let has_alignment_row = table.has_alignment_row();
    let deleted = map_rows(table, |_, row| {
        let mut row = row.clone();
        if index < row.cells.len() {
            row.cells.remove(index);
        }
        row
    });

    if deleted.header_width() > 0 {
        return deleted;
    }
    map_rows(&deleted, |row_index, row| {
        let cell = if row_index == 1 && has_alignment_row {
            Cell::delimiter(Alignment::Default, min_content_width)
        } else {
            Cell::empty()
        };
        Row::new(vec![cell], row.margin_left.clone(), row.margin_right.clone())
    })
}

/// Swap the columns at `a` and `b` in every row that has both
pub fn move_column(table: &Table, a: usize, b: usize) -> Table {
    map_rows(table, |_, row| {
        let mut row = row.clone();
        if a < row.cells.len() && b < row.cells.len() {
            row.cells.swap(a, b);
        }
        row
    })
}

/// Rewrite the alignment cell of `column`
pub fn alter_alignment(
    table: &Table,
    column: usize,
    alignment: Alignment,
    min_content_width: usize,
) -> Table {
    if !table.has_alignment_row() {
        return table.clone();
    }
    map_rows(table, |row_index, row| {
        let mut row = row.clone();
        if row_index == 1 {
            if let Some(cell) = row.cells.get_mut(column) {
                *cell = Cell::delimiter(alignment, min_content_width);
            }
        }
        row
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::new(vec![
            Row::new(vec![Cell::new(" A "), Cell::new(" B ")], "", ""),
            Row::new(vec![Cell::new(" --- "), Cell::new(" --- ")], "", ""),
            Row::new(vec![Cell::new(" C "), Cell::new(" D ")], "", ""),
            Row::new(vec![Cell::new(" E "), Cell::new(" F ")], "", ""),
        ])
    }

    #[test]
    fn test_insert_and_delete_row() {
        let original = table();
        let inserted = insert_row(&original, 3, Row::empty(2));
        assert_eq!(inserted.height(), 5);
        assert_eq!(inserted.to_lines()[3], "|||");
        assert_eq!(original.height(), 4);

        let deleted = delete_row(&inserted, 3);
        assert_eq!(deleted, original);
        assert_eq!(delete_row(&original, 10), original);
    }

    #[test]
    fn test_insert_row_past_end_appends() {
        let inserted = insert_row(&table(), 99, Row::empty(2));
        assert_eq!(inserted.height(), 5);
        assert_eq!(inserted.row(4), Some(&Row::empty(2)));
    }

    #[test]
    fn test_move_row() {
        let moved = move_row(&table(), 2, 3);
        assert_eq!(moved.to_lines()[2], "| E | F |");
        assert_eq!(moved.to_lines()[3], "| C | D |");
        assert_eq!(move_row(&table(), 3, 4), table());
    }

    #[test]
    fn test_insert_column() {
        let inserted = insert_column(&table(), 1, 3);
        assert_eq!(
            inserted.to_lines(),
            vec!["| A || B |", "| --- | --- | --- |", "| C || D |", "| E || F |"]
        );
    }

    #[test]
    fn test_delete_column() {
        let deleted = delete_column(&table(), 0, 3);
        assert_eq!(
            deleted.to_lines(),
            vec!["| B |", "| --- |", "| D |", "| F |"]
        );
    }

    #[test]
    fn test_delete_last_column_keeps_one() {
        let single = delete_column(&table(), 0, 3);
        let empty = delete_column(&single, 0, 3);
        assert_eq!(empty.width(), 1);
        assert_eq!(empty.to_lines(), vec!["||", "| --- |", "||", "||"]);
        assert!(empty.has_alignment_row());
    }

    #[test]
    fn test_move_column() {
        let moved = move_column(&table(), 0, 1);
        assert_eq!(moved.to_lines()[0], "| B | A |");
        assert_eq!(moved.to_lines()[2], "| D | C |");
        assert_eq!(move_column(&table(), 1, 2), table());
    }

    #[test]
    fn test_alter_alignment() {
        let altered = alter_alignment(&table(), 1, Alignment::Center, 3);
        assert_eq!(altered.to_lines()[1], "| --- |:---:|");
        assert_eq!(alter_alignment(&table(), 5, Alignment::Left, 3), table());
    }
}
