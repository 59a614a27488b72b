//! Text editing host for table commands.
//!
//! - [`TextEditor`]: the line-oriented interface table commands edit through
//! - [`RopeEditor`]: an in-memory implementation over `ropey::Rope`
//! - [`Position`] / [`Selection`]: zero-based buffer coordinates
//! - [`EditHistory`]: transaction-based undo/redo used by `RopeEditor`

mod buffer;
mod cursor;
mod history;
mod selection;

pub use buffer::{RopeEditor, TextEditor};
pub use cursor::Position;
pub use history::{EditHistory, EditOperation, Transaction};
pub use selection::Selection;
