//! Display width and padding for cell text
//!
//! Widths follow the East Asian Width property: wide and fullwidth
//! characters take two columns, everything else one, and ambiguous
//! characters are configurable. Per-character overrides win over the
//! Unicode data.

use std::collections::BTreeSet;

use unicode_width::UnicodeWidthChar;

use crate::table::Alignment;

/// How characters are measured when computing column widths
#[derive(Debug, Clone, Copy)]
pub struct WidthPolicy<'a> {
    /// Treat East Asian Ambiguous characters as two columns wide
    pub ambiguous_as_wide: bool,
    /// Characters that always take two columns
    pub always_wide: &'a BTreeSet<char>,
    /// Characters that always take one column (loses to `always_wide`)
    pub always_narrow: &'a BTreeSet<char>,
}

impl<'a> WidthPolicy<'a> {
    pub fn new(
        ambiguous_as_wide: bool,
        always_wide: &'a BTreeSet<char>,
        always_narrow: &'a BTreeSet<char>,
    ) -> Self {
        Self {
            ambiguous_as_wide,
            always_wide,
            always_narrow,
        }
    }

    /// Display width of a single character
    pub fn char_width(&self, ch: char) -> usize {
        if self.always_wide.contains(&ch) {
            return 2;
        }
        if self.always_narrow.contains(&ch) {
            return 1;
        }
        // `width_cjk` only differs from `width` on Ambiguous characters.
        let width = if self.ambiguous_as_wide {
            ch.width_cjk()
        } else {
            ch.width()
        };
        // Control and zero-width characters still occupy a column.
        match width {
            Some(2) => 2,
            _ => 1,
        }
    }

    /// Display width of a string
    pub fn display_width(&self, text: &str) -> usize {
        text.chars().map(|ch| self.char_width(ch)).sum()
    }

    /// Pad `text` with spaces up to `width` columns.
    ///
    /// Content wider than `width` is returned as-is; it is never truncated.
    pub fn pad(&self, text: &str, width: usize, alignment: Alignment) -> String {
        let text_width = self.display_width(text);
        if text_width >= width {
            return text.to_string();
        }
        let space = width - text_width;
        let (left, right) = match alignment {
            Alignment::Right => (space, 0),
            Alignment::Center => (space / 2, space - space / 2),
            Alignment::Left | Alignment::Default => (0, space),
        };

        let mut padded = String::with_capacity(text.len() + space);
        padded.extend(std::iter::repeat(' ').take(left));
        padded.push_str(text);
        padded.extend(std::iter::repeat(' ').take(right));
        padded
    }
}

/// Number of characters in a string (the unit of buffer columns)
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
