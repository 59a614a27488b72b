//! Utility modules

pub mod text;

pub use text::{char_len, WidthPolicy};
