//! pipetab - markdown pipe table editing
//!
//! This crate provides a table model, a width-aware formatter and a
//! command engine that edits tables through a line-oriented
//! [`editable::TextEditor`] host.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod document;
pub mod editable;
pub mod engine;
pub mod table;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use commands::TableCommand;
pub use config::TableOptions;
pub use editable::{RopeEditor, TextEditor};
pub use engine::{CommandOutcome, TableEditor};
pub use table::{Alignment, Table};
