//! Markdown pipe tables
//!
//! - [`model`]: `Table` / `Row` / `Cell` values
//! - [`parser`]: reading rows from lines of text
//! - [`focus`]: mapping buffer positions to table coordinates and back
//! - [`complete`] / [`format`]: normalizing and pretty-printing
//! - [`edit`]: structural edits (rows, columns, alignment)

pub mod complete;
pub mod edit;
pub mod focus;
pub mod format;
pub mod model;
pub mod parser;

pub use complete::{complete_table, Completed};
pub use focus::{compute_focus, compute_position, compute_selection_range, Focus};
pub use format::{format_table, Formatted};
pub use model::{Alignment, Cell, Row, Table};
pub use parser::{is_table_row, read_table, read_table_row, split_cells};
