//! Completion: make a ragged table rectangular before formatting

use crate::config::TableOptions;

use super::model::{Alignment, Cell, Row, Table};

/// Result of [`complete_table`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    pub table: Table,
    /// An alignment row was synthesized at index 1; focus rows below the
    /// header shift down by one.
    pub alignment_inserted: bool,
}

/// Pad `row` to `width` cells.
///
/// The first new cell takes the row's right margin text so trailing
/// whitespace typed after the last pipe becomes the new cell.
fn pad_row(row: &Row, width: usize) -> Row {
    if row.width() >= width {
        return row.clone();
    }
    let mut cells = row.cells.clone();
    cells.push(Cell::new(row.margin_right.clone()));
    cells.resize_with(width, Cell::empty);
    Row::new(cells, row.margin_left.clone(), "")
}

fn pad_alignment_row(row: &Row, width: usize, min_content_width: usize) -> Row {
    if row.width() >= width {
        return row.clone();
    }
    let mut cells = row.cells.clone();
    cells.resize_with(width, || {
        Cell::delimiter(Alignment::Default, min_content_width)
    });
    Row::new(cells, row.margin_left.clone(), "")
}

fn alignment_row(width: usize, min_content_width: usize) -> Row {
    Row::new(
        vec![Cell::delimiter(Alignment::Default, min_content_width); width],
        "",
        "",
    )
}

/// Complete a table: every row gets `width` cells and an alignment row
/// exists at index 1.
pub fn complete_table(table: &Table, options: &TableOptions) -> Completed {
    let min_content_width = options.min_content_width;

    if table.height() == 0 {
        return complete_table(&Table::new(vec![Row::empty(0)]), options);
    }

    if table.width() == 0 {
        let rows = table
            .rows()
            .iter()
            .map(|row| {
                Row::new(
                    vec![Cell::new(row.margin_right.clone())],
                    row.margin_left.clone(),
                    "",
                )
            })
            .collect();
        return complete_table(&Table::new(rows), options);
    }

    let width = table.width();
    let has_alignment_row = table.has_alignment_row();
    let mut rows = Vec::with_capacity(table.height() + usize::from(!has_alignment_row));

    for (index, row) in table.rows().iter().enumerate() {
        if index == 1 && has_alignment_row {
            rows.push(pad_alignment_row(row, width, min_content_width));
        } else {
            rows.push(pad_row(row, width));
        }
        if index == 0 && !has_alignment_row {
            rows.push(alignment_row(width, min_content_width));
        }
    }

    Completed {
        table: Table::new(rows),
        alignment_inserted: !has_alignment_row,
    }
}
