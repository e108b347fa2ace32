use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::block::Table;
use crate::inline::format_inline;

static SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\|?\s*:?-+:?\s*(\|\s*:?-+:?\s*)*\|?\s*$").expect("Invalid separator regex")
});

/// Whether a line is a table separator row such as `|---|:--:|`.
pub fn is_separator(line: &str) -> bool {
    SEPARATOR.is_match(line.trim())
}

/// Split a table row into trimmed cells, dropping one outer pipe on each side.
///
/// `\|` is not an escape; the backslash stays in the cell.
pub fn split_row(line: &str) -> Vec<&str> {
    let row = line.trim();
    let row = row.strip_prefix('|').unwrap_or(row);
    let row = row.strip_suffix('|').unwrap_or(row);
    row.split('|').map(str::trim).collect()
}

/// Build a table from a run of pipe-containing lines.
///
/// Returns `None` unless line 2 is a separator and every body row has as many
/// cells as the header. Rejected runs are never partially populated.
pub fn recognize<S: AsRef<str>>(lines: &[S]) -> Option<Table> {
    let [header, separator, body @ ..] = lines else {
        debug!(lines = lines.len(), "table rejected: too few lines");
        return None;
    };
    if !is_separator(separator.as_ref()) {
        debug!("table rejected: no separator row");
        return None;
    }

    let header = split_row(header.as_ref());
    let mut rows = Vec::with_capacity(body.len());
    for line in body {
        let cells = split_row(line.as_ref());
        if cells.len() != header.len() {
            debug!(
                expected = header.len(),
                found = cells.len(),
                "table rejected: inconsistent row width"
            );
            return None;
        }
        rows.push(cells.into_iter().map(format_inline).collect());
    }

    Some(Table {
        header: header.into_iter().map(format_inline).collect(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Inline;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn cells(row: &[Vec<Inline>]) -> Vec<String> {
        row.iter()
            .map(|cell| match cell.as_slice() {
                [Inline::Text(t)] => t.clone(),
                [] => String::new(),
                other => format!("{other:?}"),
            })
            .collect()
    }

    #[test]
    fn simple_table() {
        let table = recognize(&["| A | B |", "|---|---|", "| 1 | 2 |"]).unwrap();
        assert_eq!(cells(&table.header), vec!["A", "B"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(cells(&table.rows[0]), vec!["1", "2"]);
    }

    #[test]
    fn extra_cell_rejects_table() {
        assert_eq!(recognize(&["| A | B |", "|---|---|", "| 1 | 2 | 3 |"]), None);
    }

    #[test]
    fn missing_cell_rejects_table() {
        assert_eq!(recognize(&["A | B", "--- | ---", "1"]), None);
    }

    #[test]
    fn header_only_table() {
        let table = recognize(&["| A | B |", "| :-- | --: |"]).unwrap();
        assert_eq!(table.columns(), 2);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn single_line_is_not_a_table() {
        assert_eq!(recognize(&["a | b"]), None);
    }

    #[test]
    fn cells_are_inline_formatted() {
        let table = recognize(&["| **Name** | Link |", "|---|---|", "| `x` | [a](b) |"]).unwrap();
        assert_eq!(table.header[0], vec![Inline::Bold(vec![Inline::text("Name")])]);
        assert_eq!(table.rows[0][0], vec![Inline::Code("x".to_string())]);
    }

    #[test]
    fn escaped_pipe_is_not_an_escape() {
        assert_eq!(split_row(r"| a \| b |"), vec![r"a \", "b"]);
    }

    #[test]
    fn empty_cells_are_kept() {
        assert_eq!(split_row("| a || c |"), vec!["a", "", "c"]);
    }

    #[rstest]
    #[case("|---|---|", true)]
    #[case("---|---", true)]
    #[case("| :---: | ---: |", true)]
    #[case("  |-|  ", true)]
    #[case("---", true)]
    #[case("| a | b |", false)]
    #[case("|---|x|", false)]
    #[case("| |", false)]
    #[case("|::|", false)]
    fn separator_rows(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(is_separator(line), expected);
    }
}
