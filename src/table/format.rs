//! Formatter: pad every column to a common display width

use crate::config::TableOptions;

use super::model::{Alignment, Cell, Row, Table};

/// Result of [`format_table`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub table: Table,
    /// Left margin shared by every formatted row
    pub margin_left: String,
}

/// Format a (completed) table.
///
/// Content wider than its column is never truncated; the column simply
/// grows to fit it.
pub fn format_table(table: &Table, options: &TableOptions) -> Formatted {
    let margin_left = table
        .row(0)
        .map(|row| row.margin_left.clone())
        .unwrap_or_default();

    let width = table.width();
    let height = table.height();
    if width == 0 || height == 0 {
        return Formatted {
            table: Table::new(vec![Row::empty(0); height]),
            margin_left,
        };
    }

    let policy = options.width_policy();
    let alignment_row = table.alignment_row();

    let column_widths: Vec<usize> = (0..width)
        .map(|column| {
            table
                .rows()
                .iter()
                .enumerate()
                .filter(|&(index, _)| index != 1 || alignment_row.is_none())
                .filter_map(|(_, row)| row.cell(column))
                .map(|cell| policy.display_width(cell.content()))
                .fold(options.min_content_width, usize::max)
        })
        .collect();

    let alignments: Vec<Alignment> = (0..width)
        .map(|column| {
            alignment_row
                .and_then(|row| row.cell(column))
                .map(Cell::alignment)
                .unwrap_or_default()
        })
        .collect();

    let rows = table
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let cells = (0..width)
                .map(|column| {
                    let alignment = alignments[column];
                    let column_width = column_widths[column];
                    if index == 1 && alignment_row.is_some() {
                        return Cell::delimiter(alignment, column_width);
                    }
                    let rendered = if index == 0 {
                        options.header_cell_alignment(alignment)
                    } else {
                        options.body_alignment(alignment)
                    };
                    let content = row.cell(column).map(Cell::content).unwrap_or("");
                    Cell::new(format!(
                        " {} ",
                        policy.pad(content, column_width, rendered)
                    ))
                })
                .collect();
            Row::new(cells, margin_left.clone(), "")
        })
        .collect();

    Formatted {
        table: Table::new(rows),
        margin_left,
    }
}
