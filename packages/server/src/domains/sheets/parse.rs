//! Table parser: raw delimited text to a header row plus a cell matrix

use serde::{Deserialize, Serialize};

/// Parsed spreadsheet tab: trimmed headers and rows normalized to the
/// header width.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() || self.rows.is_empty()
    }
}

/// Parse CSV-like text into a table.
///
/// Blank lines are dropped before anything else; zero non-empty lines
/// yields an empty table rather than an error. Every data row is read
/// position-by-position against the header count, so ragged rows are
/// padded with empty cells (and surplus cells are dropped) instead of
/// being rejected. All text is whitespace-trimmed.
pub fn parse_table(csv_text: &str) -> SheetTable {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv_text.trim().as_bytes());

    let records: Vec<Vec<String>> = reader
        .records()
        .filter_map(|result| result.ok())
        .map(|record| {
            record
                .iter()
                .map(|cell| cell.trim().to_string())
                .collect::<Vec<String>>()
        })
        .filter(|cells| cells.iter().any(|cell| !cell.is_empty()))
        .collect();

    let Some((first, body)) = records.split_first() else {
        return SheetTable::default();
    };

    let headers = first.clone();
    let rows = body
        .iter()
        .map(|row| {
            (0..headers.len())
                .map(|idx| row.get(idx).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    SheetTable { headers, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_headers_and_rows() {
        let table = parse_table("名前,説明\nAlpha,短い文。\nBeta,別の文。\n");
        assert_eq!(table.headers, vec!["名前", "説明"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["Alpha", "短い文。"]);
    }

    #[test]
    fn pads_ragged_rows_to_header_width() {
        let table = parse_table("a,b,c,d\n1,2\n");
        assert_eq!(table.headers.len(), 4);
        assert_eq!(table.rows[0], vec!["1", "2", "", ""]);
    }

    #[test]
    fn drops_cells_beyond_header_width() {
        let table = parse_table("a,b\n1,2,3,4\n");
        assert_eq!(table.rows[0], vec!["1", "2"]);
    }

    #[test]
    fn skips_blank_lines() {
        let table = parse_table("a,b\n\n1,2\n\n\n3,4\n");
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn empty_input_yields_empty_table() {
        assert_eq!(parse_table(""), SheetTable::default());
        assert_eq!(parse_table("  \n \n"), SheetTable::default());
        assert!(parse_table("").is_empty());
    }

    #[test]
    fn header_only_input_has_no_rows() {
        let table = parse_table("a,b\n");
        assert_eq!(table.headers, vec!["a", "b"]);
        assert!(table.rows.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn trims_all_cells() {
        let table = parse_table(" a , b \n 1 , 2 \n");
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows[0], vec!["1", "2"]);
    }

    #[test]
    fn quoted_cells_keep_embedded_commas() {
        let table = parse_table("a,b\n\"one, two\",3\n");
        assert_eq!(table.rows[0], vec!["one, two", "3"]);
    }
}
