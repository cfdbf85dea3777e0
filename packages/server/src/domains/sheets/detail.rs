//! Detail page synthesis
//!
//! Narrative cells become standalone sub-pages: one section titled after
//! the column header, one text item holding the reformatted prose. The
//! reformatting is a readability heuristic: a paragraph break after any
//! sentence of 60+ characters, nothing fancier.

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use sqlx::types::Json;

use crate::domains::pages::{ContentBody, ContentItem, Page, PageSection};

/// Sentence length (in characters, full stop included) that triggers a
/// paragraph break after it.
const PARAGRAPH_BREAK_LEN: usize = 60;

lazy_static! {
    static ref NEWLINE_RUNS: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Member-area URL of a page
pub fn page_url(slug: &str) -> String {
    format!("/dashboard/pages/{slug}")
}

/// Reformat narrative text for the detail page.
///
/// Splits on the ideographic full stop, trims fragments, re-appends the
/// stop to each, and inserts a blank line after fragments of 60+
/// characters. Runs of 3+ newlines collapse to exactly two.
pub fn format_detail_text(value: &str) -> String {
    let sentences: Vec<String> = value
        .split('。')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| format!("{fragment}。"))
        .collect();

    if sentences.is_empty() {
        return String::new();
    }

    let mut formatted: Vec<String> = Vec::new();
    for sentence in sentences {
        let break_after = sentence.chars().count() >= PARAGRAPH_BREAK_LEN;
        formatted.push(sentence);
        if break_after {
            formatted.push(String::new());
        }
    }

    let joined = formatted.join("\n");
    NEWLINE_RUNS.replace_all(&joined, "\n\n").trim().to_string()
}

/// Build the sub-page for one narrative cell.
///
/// `slug` comes from the content-hash seed (see `slug::detail_slug`);
/// title is the row's first-column value (the caller supplies the
/// numbered fallback for untitled rows).
pub fn synthesize_detail_page(
    slug: &str,
    title: &str,
    header: &str,
    raw_text: &str,
    parent_slug: &str,
    published: bool,
    source_key: Option<&str>,
) -> Page {
    let now = Utc::now();
    Page {
        slug: slug.to_string(),
        title: title.to_string(),
        description: Some(header.to_string()),
        published,
        sections: Json(vec![PageSection {
            id: format!("{slug}-section"),
            title: header.to_string(),
            items: vec![ContentItem {
                id: format!("{slug}-text"),
                title: Some(title.to_string()),
                body: ContentBody::Text {
                    text: format_detail_text(raw_text),
                },
            }],
        }]),
        ord: None,
        parent_slug: Some(parent_slug.to_string()),
        source_key: source_key.map(str::to_string),
        detail_pages: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_sentences_get_no_breaks() {
        assert_eq!(format_detail_text("Hello world."), "Hello world.。");
        assert_eq!(format_detail_text("短い文。もう一つ。"), "短い文。\nもう一つ。");
    }

    #[test]
    fn long_sentence_is_followed_by_blank_line() {
        let long = "あ".repeat(60);
        let input = format!("{long}。短い文。");
        let formatted = format_detail_text(&input);
        assert_eq!(formatted, format!("{long}。\n\n短い文。"));
    }

    #[test]
    fn sentence_just_under_threshold_gets_no_break() {
        // 58 chars + the re-appended full stop = 59
        let body = "あ".repeat(58);
        let input = format!("{body}。次。");
        let formatted = format_detail_text(&input);
        assert_eq!(formatted, format!("{body}。\n次。"));
    }

    #[test]
    fn empty_and_stop_only_input_yields_empty_text() {
        assert_eq!(format_detail_text(""), "");
        assert_eq!(format_detail_text("。。。"), "");
        assert_eq!(format_detail_text("   "), "");
    }

    #[test]
    fn trailing_break_is_trimmed() {
        let long = "あ".repeat(70);
        let formatted = format_detail_text(&format!("{long}。"));
        assert_eq!(formatted, format!("{long}。"));
    }

    #[test]
    fn synthesized_page_shape() {
        let page = synthesize_detail_page(
            "sheet-abc-0-alpha-12345678",
            "Alpha",
            "説明",
            "Hello world。",
            "sheet-abc-0",
            false,
            Some("abc:0"),
        );

        assert_eq!(page.title, "Alpha");
        assert_eq!(page.description.as_deref(), Some("説明"));
        assert_eq!(page.parent_slug.as_deref(), Some("sheet-abc-0"));
        assert_eq!(page.source_key.as_deref(), Some("abc:0"));
        assert!(!page.published);
        assert_eq!(page.sections.0.len(), 1);

        let section = &page.sections.0[0];
        assert_eq!(section.id, "sheet-abc-0-alpha-12345678-section");
        assert_eq!(section.title, "説明");
        assert_eq!(section.items.len(), 1);

        let item = &section.items[0];
        assert_eq!(item.id, "sheet-abc-0-alpha-12345678-text");
        assert_eq!(item.title.as_deref(), Some("Alpha"));
        match &item.body {
            ContentBody::Text { text } => assert_eq!(text, "Hello world。"),
            other => panic!("expected text item, got {other:?}"),
        }
    }
}
