//! Slug derivation
//!
//! `slugify` is deterministic and collision-blind; callers fold a
//! disambiguator into the seed. Detail-page slugs use a content hash of
//! the row title and column header, so re-imports keep the same slug for
//! an unchanged row no matter where it sits in the sheet.

use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

const MAX_SLUG_LEN: usize = 64;

lazy_static! {
    static ref SEPARATORS: Regex = Regex::new(r"[\s_]+").unwrap();
    static ref HYPHEN_RUNS: Regex = Regex::new(r"-+").unwrap();
}

/// Lowercase, whitespace/underscore runs to single hyphens, strip
/// everything outside `[a-z0-9-]`, collapse hyphen runs, cap at 64
/// characters, no leading or trailing hyphens.
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    let hyphened = SEPARATORS.replace_all(lowered.trim(), "-");
    let cleaned: String = hyphened
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();
    let collapsed = HYPHEN_RUNS.replace_all(&cleaned, "-");
    let capped: String = collapsed.chars().take(MAX_SLUG_LEN).collect();
    capped.trim_matches('-').to_string()
}

/// Slug for a synthesized detail page.
///
/// The disambiguator is the first 8 hex chars of
/// `sha256("<base>|<title>|<header>")` rather than the row position, so
/// inserting or removing rows upstream does not shift the slugs of
/// unchanged rows.
pub fn detail_slug(base: &str, title: &str, header: &str) -> String {
    let digest = Sha256::digest(format!("{base}|{title}|{header}").as_bytes());
    let suffix = hex::encode(&digest[..4]);
    slugify(&format!("{base}-{title}-{header}-{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_normalization() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Foo_Bar  Baz "), "foo-bar-baz");
        assert_eq!(slugify("a--b---c"), "a-b-c");
    }

    #[test]
    fn strips_disallowed_characters() {
        assert_eq!(slugify("Sheet #3 (draft)!"), "sheet-3-draft");
        assert_eq!(slugify("日本語タイトル"), "");
        assert_eq!(slugify("sheet-日本語-0"), "sheet-0");
    }

    #[test]
    fn no_edge_hyphens() {
        assert_eq!(slugify("abc_"), "abc");
        assert_eq!(slugify("-abc-"), "abc");
        assert_eq!(slugify("___"), "");
    }

    #[test]
    fn caps_length_at_64() {
        let long = "a".repeat(200);
        let slug = slugify(&long);
        assert_eq!(slug.len(), 64);
    }

    #[test]
    fn is_deterministic_and_well_formed() {
        let inputs = ["Some Title 42", "  mixed_CASE  input ", "記号!と英数abc123"];
        for input in inputs {
            let a = slugify(input);
            let b = slugify(input);
            assert_eq!(a, b);
            assert!(a.len() <= 64);
            assert!(a.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            assert!(!a.starts_with('-') && !a.ends_with('-'));
            assert!(!a.contains("--"));
        }
    }

    #[test]
    fn detail_slug_is_stable_and_distinct() {
        let a = detail_slug("sheet-abc123-0", "Alpha", "説明");
        let b = detail_slug("sheet-abc123-0", "Alpha", "説明");
        let c = detail_slug("sheet-abc123-0", "Beta", "説明");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("sheet-abc123-0-alpha-"));
        // Hash suffix survives even when title and header are non-ASCII
        let d = detail_slug("sheet-abc123-0", "データ", "説明");
        assert!(d.len() > "sheet-abc123-0".len());
    }
}
