//! Pipe table data model
//!
//! Tables are plain values rebuilt from buffer text for every command.
//! Nothing here holds a reference back to the buffer.

use serde::{Deserialize, Serialize};

use crate::util::char_len;

/// Text alignment of a column, as encoded by the alignment row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// `---`, rendered with the configured default alignment
    #[default]
    Default,
    /// `:---`
    Left,
    /// `---:`
    Right,
    /// `:---:`
    Center,
}

/// A single cell: the raw text between two pipes, whitespace included
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub raw: String,
}

impl Cell {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// An empty cell (`||`)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Canonical alignment cell with `width` dashes
    pub fn delimiter(alignment: Alignment, width: usize) -> Self {
        let dashes = "-".repeat(width);
        let raw = match alignment {
            Alignment::Default => format!(" {} ", dashes),
            Alignment::Left => format!(":{} ", dashes),
            Alignment::Right => format!(" {}:", dashes),
            Alignment::Center => format!(":{}:", dashes),
        };
        Self { raw }
    }

    /// The trimmed content of the cell
    pub fn content(&self) -> &str {
        self.raw.trim()
    }

    /// Whether the cell matches `^\s*:?-+:?\s*$`
    pub fn is_alignment_cell(&self) -> bool {
        let trimmed = self.content();
        let inner = trimmed.strip_prefix(':').unwrap_or(trimmed);
        let inner = inner.strip_suffix(':').unwrap_or(inner);
        !inner.is_empty() && inner.chars().all(|c| c == '-')
    }

    /// Alignment encoded by the cell; `Default` for non-alignment cells
    pub fn alignment(&self) -> Alignment {
        if !self.is_alignment_cell() {
            return Alignment::Default;
        }
        let content = self.content();
        match (content.starts_with(':'), content.ends_with(':')) {
            (true, true) => Alignment::Center,
            (true, false) => Alignment::Left,
            (false, true) => Alignment::Right,
            (false, false) => Alignment::Default,
        }
    }

    /// Number of leading whitespace characters in `raw`
    fn leading_whitespace(&self) -> usize {
        self.raw.chars().take_while(|c| c.is_whitespace()).count()
    }

    /// Convert an offset in `raw` into an offset in `content`, clamped
    pub fn compute_content_offset(&self, raw_offset: usize) -> usize {
        let content_len = char_len(self.content());
        if content_len == 0 {
            return 0;
        }
        raw_offset
            .saturating_sub(self.leading_whitespace())
            .min(content_len)
    }

    /// Convert an offset in `content` into an offset in `raw`.
    ///
    /// A whitespace-only cell maps to 1 so the cursor sits after the
    /// leading padding space.
    pub fn compute_raw_offset(&self, content_offset: usize) -> usize {
        if self.content().is_empty() {
            return if self.raw.is_empty() { 0 } else { 1 };
        }
        self.leading_whitespace() + content_offset
    }

    pub fn to_text(&self) -> &str {
        &self.raw
    }
}

/// One line of a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
    /// Text before the first pipe
    pub margin_left: String,
    /// Whitespace after the last pipe
    pub margin_right: String,
}

impl Row {
    pub fn new(
        cells: Vec<Cell>,
        margin_left: impl Into<String>,
        margin_right: impl Into<String>,
    ) -> Self {
        Self {
            cells,
            margin_left: margin_left.into(),
            margin_right: margin_right.into(),
        }
    }

    /// A row of `width` empty cells with no margins
    pub fn empty(width: usize) -> Self {
        Self::new(vec![Cell::empty(); width], "", "")
    }

    /// Number of cells
    pub fn width(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, column: usize) -> Option<&Cell> {
        self.cells.get(column)
    }

    /// Whether every cell is an alignment cell (vacuously true for no cells)
    pub fn is_alignment_row(&self) -> bool {
        self.cells.iter().all(Cell::is_alignment_cell)
    }

    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(
            self.margin_left.len()
                + self.margin_right.len()
                + self.cells.iter().map(|c| c.raw.len() + 1).sum::<usize>()
                + 1,
        );
        text.push_str(&self.margin_left);
        text.push('|');
        for cell in &self.cells {
            text.push_str(cell.to_text());
            text.push('|');
        }
        text.push_str(&self.margin_right);
        text
    }
}

/// A table: row 0 is the header, row 1 may be the alignment row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Maximum number of cells across all rows
    pub fn width(&self) -> usize {
        self.rows.iter().map(Row::width).max().unwrap_or(0)
    }

    /// Number of cells in the header row
    pub fn header_width(&self) -> usize {
        self.rows.first().map(Row::width).unwrap_or(0)
    }

    /// Row 1, if it is a non-empty row consisting only of alignment cells
    pub fn alignment_row(&self) -> Option<&Row> {
        self.rows
            .get(1)
            .filter(|row| row.width() > 0 && row.is_alignment_row())
    }

    pub fn has_alignment_row(&self) -> bool {
        self.alignment_row().is_some()
    }

    /// Cell at (row, column), if it exists
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.cell(column))
    }

    pub fn to_lines(&self) -> Vec<String> {
        self.rows.iter().map(Row::to_text).collect()
    }

    pub fn to_text(&self) -> String {
        self.to_lines().join("\n")
    }
}
