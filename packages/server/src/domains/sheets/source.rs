//! Spreadsheet references
//!
//! A source is identified by the `(sheetId, gid)` pair extracted from a
//! Google Sheets URL. The pair round-trips through the stored source key
//! (`"<sheetId>:<gid>"`) so re-sync can re-derive the fetch target.

use lazy_static::lazy_static;
use regex::Regex;

use super::slug::slugify;

lazy_static! {
    static ref SHEET_ID: Regex = Regex::new(r"/spreadsheets/d/([a-zA-Z0-9-_]+)").unwrap();
    static ref GID: Regex = Regex::new(r"gid=(\d+)").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRef {
    pub sheet_id: String,
    pub gid: String,
}

impl SheetRef {
    /// Extract a reference from a spreadsheet URL. The tab defaults to
    /// `0` when no `gid` parameter is present.
    pub fn from_url(url: &str) -> Option<Self> {
        let sheet_id = SHEET_ID.captures(url)?.get(1)?.as_str().to_string();
        let gid = GID
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "0".to_string());
        Some(Self { sheet_id, gid })
    }

    /// Re-derive a reference from a stored source key
    pub fn from_source_key(key: &str) -> Option<Self> {
        let (sheet_id, gid) = key.split_once(':')?;
        if sheet_id.is_empty() || gid.is_empty() {
            return None;
        }
        Some(Self {
            sheet_id: sheet_id.to_string(),
            gid: gid.to_string(),
        })
    }

    /// Stored form: `"<sheetId>:<gid>"`
    pub fn source_key(&self) -> String {
        format!("{}:{}", self.sheet_id, self.gid)
    }

    /// Public CSV export endpoint for this tab
    pub fn csv_export_url(&self) -> String {
        format!(
            "https://docs.google.com/spreadsheets/d/{}/gviz/tq?tqx=out:csv&gid={}",
            self.sheet_id, self.gid
        )
    }

    /// Slug base for the imported page: a short stable prefix of the
    /// sheet id plus the tab.
    pub fn slug_base(&self) -> String {
        let prefix: String = self.sheet_id.chars().take(6).collect();
        slugify(&format!("sheet-{}-{}", prefix, self.gid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_and_gid() {
        let url = "https://docs.google.com/spreadsheets/d/1AbC-d_9/edit#gid=123";
        let sheet = SheetRef::from_url(url).unwrap();
        assert_eq!(sheet.sheet_id, "1AbC-d_9");
        assert_eq!(sheet.gid, "123");
    }

    #[test]
    fn gid_defaults_to_zero() {
        let url = "https://docs.google.com/spreadsheets/d/1AbC/edit";
        let sheet = SheetRef::from_url(url).unwrap();
        assert_eq!(sheet.gid, "0");
    }

    #[test]
    fn rejects_non_sheet_urls() {
        assert!(SheetRef::from_url("https://example.com/other").is_none());
        assert!(SheetRef::from_url("").is_none());
    }

    #[test]
    fn source_key_round_trips() {
        let sheet = SheetRef::from_url("https://docs.google.com/spreadsheets/d/xyz?gid=7").unwrap();
        let key = sheet.source_key();
        assert_eq!(key, "xyz:7");
        assert_eq!(SheetRef::from_source_key(&key).unwrap(), sheet);
    }

    #[test]
    fn rejects_malformed_source_keys() {
        assert!(SheetRef::from_source_key("no-colon").is_none());
        assert!(SheetRef::from_source_key(":7").is_none());
        assert!(SheetRef::from_source_key("abc:").is_none());
    }

    #[test]
    fn export_url_targets_the_tab() {
        let sheet = SheetRef {
            sheet_id: "abc".to_string(),
            gid: "2".to_string(),
        };
        assert_eq!(
            sheet.csv_export_url(),
            "https://docs.google.com/spreadsheets/d/abc/gviz/tq?tqx=out:csv&gid=2"
        );
    }

    #[test]
    fn slug_base_shortens_the_id() {
        let sheet = SheetRef {
            sheet_id: "1AbCdEfGhIj".to_string(),
            gid: "0".to_string(),
        };
        assert_eq!(sheet.slug_base(), "sheet-1abcde-0");
    }
}
