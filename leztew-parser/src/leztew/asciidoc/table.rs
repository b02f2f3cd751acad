//! AsciiDoc tables
//!
//!     A table is delimited by `|===` lines. Every unescaped `|` starts a cell; the token right
//!     before it (at the start of a line or after whitespace) may be a cell specifier:
//!
//!         .2+| Input value sockets     row span 2
//!         2+|  Wide                    column span 2
//!         2.3+^.^a|                    both spans, alignment and style
//!         3*|  Same                    the cell repeated three times
//!
//!     Cells do not say which row they belong to. Rows are rebuilt from the column count: a row
//!     is complete once every column is either filled or still covered by a row span from above.
//!     Rows below a row-spanning cell therefore have fewer cells, which is exactly what the
//!     operation table parser relies on.

use crate::leztew::document::{Cell, Row, Table};
use once_cell::sync::Lazy;
use regex::Regex;

/// Full-token match of a cell specifier (possibly empty).
static CELL_SPEC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?P<dup>\d+)\*)?(?:(?P<colspan>\d+)?(?:\.(?P<rowspan>\d+))?\+)?[<^>]?(?:\.[<^>])?[adehlmsv]?$")
        .unwrap()
});

/// One `N*spec` entry of a `cols` attribute.
static COLS_ENTRY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?:(\d+)\*)?").unwrap());

/// Table-relevant block attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TableOptions {
    pub columns: Option<usize>,
    pub header: Option<bool>,
}

impl TableOptions {
    /// Read `cols`, `options` and `%header`/`%noheader` from a block attribute list.
    pub fn from_attributes(attributes: &[String]) -> Self {
        let mut options = TableOptions::default();
        for attribute in attributes {
            for entry in split_attribute_list(attribute) {
                let entry = entry.trim();
                if let Some(value) = entry.strip_prefix("cols=") {
                    options.columns = column_count(unquote(value));
                } else if let Some(value) = entry.strip_prefix("options=") {
                    apply_options(&mut options, unquote(value).split(','));
                } else if let Some(value) = entry.strip_prefix("opts=") {
                    apply_options(&mut options, unquote(value).split(','));
                } else if entry.contains('%') {
                    apply_options(&mut options, entry.split('%').skip(1));
                }
            }
        }
        options
    }
}

fn apply_options<'a>(options: &mut TableOptions, values: impl Iterator<Item = &'a str>) {
    for value in values {
        match value.trim() {
            "header" => options.header = Some(true),
            "noheader" => options.header = Some(false),
            _ => {}
        }
    }
}

/// Split `a="x,y",b=c` on commas outside quotes.
fn split_attribute_list(list: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    for (i, ch) in list.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                entries.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(&list[start..]);
    entries
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}

/// Column count of a `cols` value: `"1,2,3"`, `"3*"`, `"2*,1"` or a bare `"3"`.
pub(crate) fn column_count(cols: &str) -> Option<usize> {
    let cols = cols.trim();
    if cols.is_empty() {
        return None;
    }
    if let Ok(count) = cols.parse::<usize>() {
        return Some(count);
    }
    let count = cols
        .split([',', ';'])
        .map(|entry| {
            COLS_ENTRY_REGEX
                .captures(entry)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<usize>().ok())
                .unwrap_or(1)
        })
        .sum();
    Some(count)
}

/// A cell as written, before row assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawCell {
    text: String,
    colspan: usize,
    rowspan: usize,
    duplicates: usize,
    /// Zero-based content line the cell starts on
    line: usize,
}

/// Split table content into cells.
///
/// A specifier only counts at the very start of the content or after whitespace, so `|a|b`
/// is two cells with text `a` and `b`.
fn scan_cells(content: &str) -> Vec<RawCell> {
    let bytes = content.as_bytes();
    let mut cells = Vec::new();
    // (spec, text start, line) of the cell being read
    let mut open: Option<(&str, usize, usize)> = None;
    let mut segment_start = 0;
    let mut line = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        if byte == b'\n' {
            line += 1;
            continue;
        }
        if byte != b'|' || (i > 0 && bytes[i - 1] == b'\\') {
            continue;
        }
        let before = &content[segment_start..i];
        let token_start = match before.rfind(char::is_whitespace) {
            Some(p) => Some(p + before[p..].chars().next().map_or(1, char::len_utf8)),
            None if segment_start == 0 => Some(0),
            None => None,
        };
        let (text_end, spec) = match token_start {
            Some(start) if CELL_SPEC_REGEX.is_match(&before[start..]) => {
                (segment_start + start, &before[start..])
            }
            _ => (i, ""),
        };
        if let Some((previous_spec, text_start, cell_line)) = open.take() {
            cells.push(raw_cell(previous_spec, &content[text_start..text_end], cell_line));
        }
        open = Some((spec, i + 1, line));
        segment_start = i + 1;
    }
    if let Some((spec, text_start, cell_line)) = open {
        cells.push(raw_cell(spec, &content[text_start..], cell_line));
    }
    cells
}

fn raw_cell(spec: &str, text: &str, line: usize) -> RawCell {
    let captures = CELL_SPEC_REGEX.captures(spec);
    let number = |name: &str| {
        captures
            .as_ref()
            .and_then(|caps| caps.name(name))
            .and_then(|m| m.as_str().parse::<usize>().ok())
    };
    RawCell {
        text: text.trim().replace("\\|", "|"),
        colspan: number("colspan").unwrap_or(1).max(1),
        rowspan: number("rowspan").unwrap_or(1).max(1),
        duplicates: number("dup").unwrap_or(1).max(1),
        line,
    }
}

/// Build a table from the lines between the `|===` delimiters.
pub(crate) fn parse_table(lines: &[&str], options: &TableOptions) -> Table {
    let content = lines.join("\n");
    let cells: Vec<RawCell> = scan_cells(&content)
        .into_iter()
        .flat_map(|cell| std::iter::repeat(cell.clone()).take(cell.duplicates))
        .collect();

    let first_line = lines.iter().position(|line| !line.trim().is_empty());
    let columns = options
        .columns
        .or_else(|| {
            first_line.map(|index| {
                cells
                    .iter()
                    .filter(|cell| cell.line == index)
                    .map(|cell| cell.colspan)
                    .sum()
            })
        })
        .unwrap_or(1)
        .max(1);

    let (rows, first_row_lines) = assemble_rows(&cells, columns);

    let implicit_header = first_line == Some(0)
        && lines.get(1).is_some_and(|line| line.trim().is_empty())
        && first_row_lines.is_some_and(|(start, end)| start == 0 && end == 0);
    let has_header = options.header.unwrap_or(implicit_header) && !rows.is_empty();

    let mut rows = rows;
    let header = if has_header {
        vec![rows.remove(0)]
    } else {
        Vec::new()
    };
    Table { header, body: rows }
}

/// Distribute cells over rows of `columns` slots, honoring spans.
///
/// Also returns the first and last content line of the first row's cells.
fn assemble_rows(cells: &[RawCell], columns: usize) -> (Vec<Row>, Option<(usize, usize)>) {
    let mut rows = Vec::new();
    let mut first_row_lines: Option<(usize, usize)> = None;
    // Row index (exclusive) until which each column is covered by a row span
    let mut covered_until = vec![0usize; columns];
    let mut current: Vec<Cell> = Vec::new();
    let mut row_index = 0;
    let mut column = next_free_column(&covered_until, 0, row_index);

    for raw in cells {
        // A row fully covered by spans from above is empty
        while column >= columns {
            rows.push(Row::new(std::mem::take(&mut current)));
            row_index += 1;
            column = next_free_column(&covered_until, 0, row_index);
        }

        if row_index == 0 {
            first_row_lines = Some(match first_row_lines {
                Some((start, _)) => (start, raw.line),
                None => (raw.line, raw.line),
            });
        }

        let span_end = (column + raw.colspan).min(columns);
        for covered in &mut covered_until[column..span_end] {
            *covered = row_index + raw.rowspan;
        }
        current.push(
            Cell::new(raw.text.clone())
                .spanning_rows(raw.rowspan)
                .spanning_columns(raw.colspan),
        );
        column = next_free_column(&covered_until, span_end, row_index);

        if column >= columns {
            rows.push(Row::new(std::mem::take(&mut current)));
            row_index += 1;
            column = next_free_column(&covered_until, 0, row_index);
        }
    }
    if !current.is_empty() {
        log::warn!("Table ends with an incomplete row of {} cells", current.len());
        rows.push(Row::new(current));
    }
    (rows, first_row_lines)
}

fn next_free_column(covered_until: &[usize], from: usize, row_index: usize) -> usize {
    (from..covered_until.len())
        .find(|&column| covered_until[column] <= row_index)
        .unwrap_or(covered_until.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn texts(row: &Row) -> Vec<&str> {
        row.cells.iter().map(|c| c.text.as_str()).collect()
    }

    #[rstest]
    #[case("1,1,2", Some(3))]
    #[case("3*", Some(3))]
    #[case("2*,1", Some(3))]
    #[case("4", Some(4))]
    #[case("1h;2;3a", Some(3))]
    #[case("", None)]
    fn test_column_count(#[case] cols: &str, #[case] expected: Option<usize>) {
        assert_eq!(column_count(cols), expected);
    }

    #[test]
    fn test_options_from_attributes() {
        let options = TableOptions::from_attributes(&[r#"cols="1,1,2",options="header""#.to_string()]);
        assert_eq!(options.columns, Some(3));
        assert_eq!(options.header, Some(true));

        let options = TableOptions::from_attributes(&["%noheader,cols=2".to_string()]);
        assert_eq!(options.columns, Some(2));
        assert_eq!(options.header, Some(false));
    }

    #[test]
    fn test_row_span_shortens_following_rows() {
        let lines = vec![
            "| Operation | `math/sub` | Subtraction",
            ".2+| Input value sockets | `floatN a` | First operand",
            "| `floatN b` | Second operand",
            "| Output value sockets | `floatN value` | Difference",
        ];
        let table = parse_table(&lines, &TableOptions::default());

        assert!(table.header.is_empty());
        assert_eq!(table.body.len(), 4);
        assert_eq!(texts(&table.body[0]), vec!["Operation", "`math/sub`", "Subtraction"]);
        assert_eq!(table.body[1].cells[0].rowspan, 2);
        assert_eq!(texts(&table.body[2]), vec!["`floatN b`", "Second operand"]);
        assert_eq!(texts(&table.body[3])[0], "Output value sockets");
    }

    #[test]
    fn test_one_cell_per_line_with_cols() {
        let lines = vec![
            "| Operation",
            "| `math/abs`",
            "| Absolute value",
            "",
            ".3+| Configuration",
            "| `int a` | A",
            "| `int b` | B",
            "| `int c`",
            "| C",
        ];
        let options = TableOptions {
            columns: Some(3),
            header: None,
        };
        let table = parse_table(&lines, &options);
        assert_eq!(table.body.len(), 4);
        assert_eq!(texts(&table.body[1]), vec!["Configuration", "`int a`", "A"]);
        assert_eq!(texts(&table.body[3]), vec!["`int c`", "C"]);
    }

    #[test]
    fn test_implicit_header() {
        let lines = vec!["| Name | Value", "", "| a | 1", "| b | 2"];
        let table = parse_table(&lines, &TableOptions::default());
        assert_eq!(table.header.len(), 1);
        assert_eq!(texts(&table.header[0]), vec!["Name", "Value"]);
        assert_eq!(table.body.len(), 2);
    }

    #[test]
    fn test_noheader_disables_implicit_header() {
        let lines = vec!["| Name | Value", "", "| a | 1"];
        let options = TableOptions {
            columns: None,
            header: Some(false),
        };
        let table = parse_table(&lines, &options);
        assert!(table.header.is_empty());
        assert_eq!(table.body.len(), 2);
    }

    #[test]
    fn test_multiline_cell_and_escaped_pipe() {
        let lines = vec![
            "| Operation | `a\\|b` | First line",
            "continues here",
        ];
        let table = parse_table(&lines, &TableOptions::default());
        assert_eq!(table.body[0].cells[1].text, "`a|b`");
        assert_eq!(table.body[0].cells[2].text, "First line\ncontinues here");
    }

    #[test]
    fn test_column_span_and_duplication() {
        let lines = vec!["2+| Wide | Narrow", "3*| x"];
        let options = TableOptions {
            columns: Some(3),
            header: Some(false),
        };
        let table = parse_table(&lines, &options);
        assert_eq!(table.body.len(), 2);
        assert_eq!(table.body[0].cells[0].colspan, 2);
        assert_eq!(texts(&table.body[1]), vec!["x", "x", "x"]);
    }

    #[test]
    fn test_spec_needs_leading_whitespace() {
        let lines = vec!["|a|b"];
        let table = parse_table(&lines, &TableOptions::default());
        assert_eq!(texts(&table.body[0]), vec!["a", "b"]);
    }

    #[test]
    fn test_cell_text_ending_in_word_is_not_a_spec() {
        let lines = vec!["| one | two words"];
        let table = parse_table(&lines, &TableOptions::default());
        assert_eq!(texts(&table.body[0]), vec!["one", "two words"]);
    }
}
