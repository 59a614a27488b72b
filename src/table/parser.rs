//! Pipe table row parsing
//!
//! A row is split on unescaped pipes that are not inside a backtick code
//! span. Anything malformed (an unclosed code span, a trailing backslash)
//! is kept as literal text.

use std::collections::BTreeSet;

use super::model::{Cell, Row, Table};

/// Whether `line` is a table row: after leading whitespace and margin
/// characters, the first character is a pipe
pub fn is_table_row(line: &str, margin_chars: &BTreeSet<char>) -> bool {
    line.trim_start_matches(|c: char| c.is_whitespace() || margin_chars.contains(&c))
        .starts_with('|')
}

/// Split a line on cell boundaries.
///
/// Returns every segment, including the text before the first pipe and
/// after the last one.
pub fn split_cells(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut segments = Vec::new();
    let mut buf = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '`' => {
                let open = run_length(&chars, i, '`');
                match find_closing_run(&chars, i + open, open) {
                    Some(end) => {
                        buf.extend(&chars[i..end]);
                        i = end;
                    }
                    None => {
                        // unmatched: the run is literal
                        buf.extend(&chars[i..i + open]);
                        i += open;
                    }
                }
            }
            '\\' => {
                let end = (i + 2).min(chars.len());
                buf.extend(&chars[i..end]);
                i = end;
            }
            '|' => {
                segments.push(std::mem::take(&mut buf));
                i += 1;
            }
            ch => {
                buf.push(ch);
                i += 1;
            }
        }
    }
    segments.push(buf);
    segments
}

/// Length of the run of `ch` starting at `start`
fn run_length(chars: &[char], start: usize, ch: char) -> usize {
    chars[start..].iter().take_while(|&&c| c == ch).count()
}

/// Index just past a backtick run of exactly `len` at or after `from`
fn find_closing_run(chars: &[char], from: usize, len: usize) -> Option<usize> {
    let mut i = from;
    while i < chars.len() {
        if chars[i] == '`' {
            let run = run_length(chars, i, '`');
            i += run;
            if run == len {
                return Some(i);
            }
        } else {
            i += 1;
        }
    }
    None
}

/// Read a table row, or `None` if the line is not a table row
pub fn read_table_row(line: &str, margin_chars: &BTreeSet<char>) -> Option<Row> {
    if !is_table_row(line, margin_chars) {
        return None;
    }

    let mut segments = split_cells(line).into_iter();
    // The text before the first pipe only holds whitespace and margin chars.
    let margin_left = segments.next().unwrap_or_default();
    let mut rest: Vec<String> = segments.collect();
    let has_margin_right = rest
        .last()
        .is_some_and(|last| last.chars().all(char::is_whitespace));
    let margin_right = if has_margin_right {
        rest.pop().unwrap_or_default()
    } else {
        String::new()
    };

    let cells = rest.into_iter().map(Cell::new).collect();
    Some(Row::new(cells, margin_left, margin_right))
}

/// Read every table row out of `lines`, skipping lines that are not rows
pub fn read_table<S: AsRef<str>>(lines: &[S], margin_chars: &BTreeSet<char>) -> Table {
    let rows = lines
        .iter()
        .filter_map(|line| read_table_row(line.as_ref(), margin_chars))
        .collect();
    Table::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_margin() -> BTreeSet<char> {
        BTreeSet::new()
    }

    fn raws(row: &Row) -> Vec<&str> {
        row.cells.iter().map(|c| c.raw.as_str()).collect()
    }

    #[test]
    fn test_is_table_row() {
        let m = no_margin();
        assert!(is_table_row("| a |", &m));
        assert!(is_table_row("   | a |", &m));
        assert!(is_table_row("\t|", &m));
        assert!(!is_table_row("a | b", &m));
        assert!(!is_table_row("", &m));
        assert!(!is_table_row("> | a |", &m));
    }

    #[test]
    fn test_is_table_row_with_margin_chars() {
        let m: BTreeSet<char> = ['>'].into_iter().collect();
        assert!(is_table_row("> | a |", &m));
        assert!(is_table_row(" > > | a |", &m));
        assert!(!is_table_row("> a |", &m));
    }

    #[test]
    fn test_split_cells_simple() {
        assert_eq!(split_cells(" foo | bar "), vec![" foo ", " bar "]);
        assert_eq!(split_cells("|a|b|"), vec!["", "a", "b", ""]);
        assert_eq!(split_cells(""), vec![""]);
    }

    #[test]
    fn test_split_cells_code_span() {
        assert_eq!(split_cells("| foo `|` bar |"), vec!["", " foo `|` bar ", ""]);
        assert_eq!(split_cells("| ``a|`b`` | c |"), vec!["", " ``a|`b`` ", " c ", ""]);
    }

    #[test]
    fn test_split_cells_unmatched_backticks_are_literal() {
        assert_eq!(split_cells("| `a | b |"), vec!["", " `a ", " b ", ""]);
        assert_eq!(split_cells("| ``a` | b |"), vec!["", " ``a` ", " b ", ""]);
    }

    #[test]
    fn test_split_cells_escapes() {
        assert_eq!(split_cells("| foo \\| bar |"), vec!["", " foo \\| bar ", ""]);
        assert_eq!(split_cells("| a \\\\| b |"), vec!["", " a \\\\", " b ", ""]);
        assert_eq!(split_cells("| a |\\"), vec!["", " a ", "\\"]);
    }

    #[test]
    fn test_read_table_row() {
        let m = no_margin();

        let row = read_table_row(" | foo | bar ", &m).unwrap();
        assert_eq!(raws(&row), vec![" foo ", " bar "]);
        assert_eq!(row.margin_left, " ");
        assert_eq!(row.margin_right, "");

        let row = read_table_row(" | foo | bar | ", &m).unwrap();
        assert_eq!(raws(&row), vec![" foo ", " bar "]);
        assert_eq!(row.margin_left, " ");
        assert_eq!(row.margin_right, " ");

        let row = read_table_row(" | foo `|` bar | ", &m).unwrap();
        assert_eq!(raws(&row), vec![" foo `|` bar "]);

        let row = read_table_row(" | foo \\| bar | ", &m).unwrap();
        assert_eq!(raws(&row), vec![" foo \\| bar "]);
    }

    #[test]
    fn test_read_table_row_without_cells() {
        let m = no_margin();
        let row = read_table_row("| ", &m).unwrap();
        assert!(row.cells.is_empty());
        assert_eq!(row.margin_right, " ");

        let row = read_table_row("|", &m).unwrap();
        assert!(row.cells.is_empty());
        assert_eq!(row.margin_right, "");
    }

    #[test]
    fn test_read_table_row_rejects_non_rows() {
        assert!(read_table_row(" foo | bar ", &no_margin()).is_none());
    }

    #[test]
    fn test_read_table_row_margin_chars() {
        let m: BTreeSet<char> = ['>'].into_iter().collect();
        let row = read_table_row("> | a | b |", &m).unwrap();
        assert_eq!(row.margin_left, "> ");
        assert_eq!(raws(&row), vec![" a ", " b "]);
    }

    #[test]
    fn test_round_trip() {
        let m = no_margin();
        for line in [
            "| foo | bar |",
            "  | a `|` b | c \\| d |   ",
            "|||",
            "| あ | Ω |",
        ] {
            let row = read_table_row(line, &m).unwrap();
            assert_eq!(row.to_text(), line);
            assert_eq!(read_table_row(&row.to_text(), &m), Some(row));
        }
    }

    #[test]
    fn test_read_table() {
        let lines = ["| foo | bar | ", "not a row", "  | baz |   "];
        let table = read_table(&lines, &no_margin());
        assert_eq!(table.height(), 2);
        assert_eq!(table.rows()[0].margin_right, " ");
        assert_eq!(table.rows()[1].margin_left, "  ");
        assert_eq!(table.rows()[1].margin_right, "   ");
        assert_eq!(table.rows()[1].cells[0].raw, " baz ");
    }
}
