//! Column classification and cell construction
//!
//! Classification happens once per import, from headers alone. Cells are
//! then built in header order, left to right, row by row; narrative cells
//! spawn detail sub-pages as a side product.

use lazy_static::lazy_static;
use regex::Regex;

use crate::domains::pages::{Page, TableCell, TableRow};

use super::detail::{page_url, synthesize_detail_page};
use super::slug::detail_slug;

lazy_static! {
    static ref NARRATIVE_HEADER: Regex = Regex::new(r"解説|説明|詳細").unwrap();
    static ref URL_SHAPE: Regex = Regex::new(r"(?i)^https?://").unwrap();
}

/// Flags, per column, whether the header marks a narrative column whose
/// values are split into detail pages.
pub fn narrative_columns(headers: &[String]) -> Vec<bool> {
    headers
        .iter()
        .map(|header| NARRATIVE_HEADER.is_match(header))
        .collect()
}

fn is_url(value: &str) -> bool {
    URL_SHAPE.is_match(value)
}

/// Output of a classification pass: finished table rows plus the detail
/// pages synthesized from narrative cells.
#[derive(Debug, Default)]
pub struct BuiltRows {
    pub rows: Vec<TableRow>,
    pub detail_pages: Vec<Page>,
}

/// Build table rows (and their detail pages) from raw cell text.
///
/// `start_index` is the position of the first raw row within the full
/// table; re-sync passes the stored row count so numbered fallback titles
/// keep counting up. `published` is inherited by synthesized pages.
pub fn build_rows(
    headers: &[String],
    raw_rows: &[Vec<String>],
    slug_base: &str,
    start_index: usize,
    published: bool,
    source_key: Option<&str>,
) -> BuiltRows {
    let narrative = narrative_columns(headers);
    let mut built = BuiltRows::default();

    for (offset, raw_row) in raw_rows.iter().enumerate() {
        let row_index = start_index + offset;
        let mut detail_url: Option<String> = None;

        let cells = raw_row
            .iter()
            .enumerate()
            .map(|(col_index, value)| {
                let header = headers
                    .get(col_index)
                    .map(String::as_str)
                    .filter(|h| !h.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("列{}", col_index + 1));
                let trimmed = value.trim();

                if trimmed.is_empty() {
                    return TableCell::Text {
                        value: String::new(),
                    };
                }
                if is_url(trimmed) {
                    return TableCell::Link {
                        label: "リンクを開く".to_string(),
                        url: trimmed.to_string(),
                    };
                }

                if narrative.get(col_index).copied().unwrap_or(false) {
                    let base_title = raw_row
                        .first()
                        .map(|cell| cell.trim())
                        .filter(|title| !title.is_empty())
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("解説 {}", row_index + 1));
                    let slug = detail_slug(slug_base, &base_title, &header);

                    built.detail_pages.push(synthesize_detail_page(
                        &slug,
                        &base_title,
                        &header,
                        trimmed,
                        slug_base,
                        published,
                        source_key,
                    ));

                    let url = page_url(&slug);
                    if detail_url.is_none() {
                        detail_url = Some(url.clone());
                    }
                    return TableCell::Link {
                        label: format!("{header}を読む"),
                        url,
                    };
                }

                TableCell::Text {
                    value: trimmed.to_string(),
                }
            })
            .collect();

        built.rows.push(TableRow { cells, detail_url });
    }

    built
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::pages::ContentBody;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    #[test]
    fn detects_narrative_headers_by_substring() {
        let flags = narrative_columns(&headers(&["名前", "内容の説明", "リンク", "詳細メモ"]));
        assert_eq!(flags, vec![false, true, false, true]);
    }

    #[test]
    fn empty_cell_stays_empty_text() {
        let built = build_rows(&headers(&["a", "b"]), &[row(&["x", "  "])], "base", 0, false, None);
        assert_eq!(
            built.rows[0].cells[1],
            TableCell::Text {
                value: String::new()
            }
        );
        assert!(built.detail_pages.is_empty());
    }

    #[test]
    fn url_values_become_generic_links() {
        let built = build_rows(
            &headers(&["a"]),
            &[row(&["HTTPS://example.com/x"])],
            "base",
            0,
            false,
            None,
        );
        assert_eq!(
            built.rows[0].cells[0],
            TableCell::Link {
                label: "リンクを開く".to_string(),
                url: "HTTPS://example.com/x".to_string(),
            }
        );
    }

    #[test]
    fn url_inside_narrative_column_is_still_a_plain_link() {
        // URL shape wins over the narrative classification
        let built = build_rows(
            &headers(&["名前", "説明"]),
            &[row(&["Alpha", "https://example.com"])],
            "base",
            0,
            false,
            None,
        );
        assert!(built.detail_pages.is_empty());
        assert_eq!(
            built.rows[0].cells[1],
            TableCell::Link {
                label: "リンクを開く".to_string(),
                url: "https://example.com".to_string(),
            }
        );
    }

    #[test]
    fn narrative_cell_becomes_read_more_link_with_detail_page() {
        let built = build_rows(
            &headers(&["名前", "説明"]),
            &[row(&["Alpha", "Hello world."])],
            "sheet-abc-0",
            0,
            false,
            Some("abc:0"),
        );

        assert_eq!(built.detail_pages.len(), 1);
        let detail = &built.detail_pages[0];
        assert_eq!(detail.title, "Alpha");
        assert_eq!(detail.parent_slug.as_deref(), Some("sheet-abc-0"));

        match &built.rows[0].cells[1] {
            TableCell::Link { label, url } => {
                assert_eq!(label, "説明を読む");
                assert_eq!(url, &page_url(&detail.slug));
            }
            other => panic!("expected link cell, got {other:?}"),
        }
        assert_eq!(
            built.rows[0].detail_url.as_deref(),
            Some(page_url(&detail.slug).as_str())
        );

        match &detail.sections.0[0].items[0].body {
            ContentBody::Text { text } => assert_eq!(text, "Hello world.。"),
            other => panic!("expected text body, got {other:?}"),
        }
    }

    #[test]
    fn untitled_rows_fall_back_to_numbered_titles() {
        let built = build_rows(
            &headers(&["名前", "説明"]),
            &[row(&["", "本文です。"])],
            "base",
            4,
            false,
            None,
        );
        assert_eq!(built.detail_pages[0].title, "解説 5");
    }

    #[test]
    fn detail_url_keeps_the_first_narrative_link() {
        let built = build_rows(
            &headers(&["名前", "説明", "詳細"]),
            &[row(&["Alpha", "一つ目。", "二つ目。"])],
            "base",
            0,
            false,
            None,
        );
        assert_eq!(built.detail_pages.len(), 2);
        assert_eq!(
            built.rows[0].detail_url.as_deref(),
            Some(page_url(&built.detail_pages[0].slug).as_str())
        );
    }

    #[test]
    fn classification_is_stable_across_reordered_rows() {
        // Same row content produces the same detail slug regardless of
        // its position in the batch
        let rows_a = [row(&["Alpha", "本文。"]), row(&["Beta", "別文。"])];
        let rows_b = [row(&["Beta", "別文。"]), row(&["Alpha", "本文。"])];
        let built_a = build_rows(&headers(&["名前", "説明"]), &rows_a, "base", 0, false, None);
        let built_b = build_rows(&headers(&["名前", "説明"]), &rows_b, "base", 0, false, None);

        let mut slugs_a: Vec<String> =
            built_a.detail_pages.iter().map(|p| p.slug.clone()).collect();
        let mut slugs_b: Vec<String> =
            built_b.detail_pages.iter().map(|p| p.slug.clone()).collect();
        slugs_a.sort();
        slugs_b.sort();
        assert_eq!(slugs_a, slugs_b);
    }
}
