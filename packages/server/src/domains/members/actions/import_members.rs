//! Roster CSV import
//!
//! Accepts the spreadsheet people actually keep: a header row is optional,
//! and the name/email columns are found by sniffing header text in either
//! Japanese or English. Headerless files fall back to columns 0 and 1.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::info;

use crate::common::auth::{Actor, AdminCapability, AuthError};
use crate::domains::members::models::{ApprovedMember, MemberStatus};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

lazy_static! {
    static ref NAME_HEADER: Regex = Regex::new(r"(?i)名前|氏名|name").unwrap();
    static ref EMAIL_HEADER: Regex = Regex::new(r"(?i)メール|mail|email").unwrap();
}

#[derive(Error, Debug)]
pub enum ImportMembersError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("No usable rows in CSV")]
    Empty,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRow {
    pub name: String,
    pub email: String,
}

/// Extract (name, email) rows from CSV text. Rows without an email are
/// dropped; emails are lowercased.
pub fn parse_member_rows(csv_text: &str) -> Vec<MemberRow> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv_text.trim().as_bytes());

    let records: Vec<Vec<String>> = reader
        .records()
        .filter_map(|result| result.ok())
        .map(|record| record.iter().map(|cell| cell.trim().to_string()).collect())
        .filter(|cells: &Vec<String>| cells.iter().any(|cell| !cell.is_empty()))
        .collect();

    let Some(first) = records.first() else {
        return Vec::new();
    };

    let name_idx = first.iter().position(|h| NAME_HEADER.is_match(h));
    let email_idx = first.iter().position(|h| EMAIL_HEADER.is_match(h));
    let has_header = name_idx.is_some() || email_idx.is_some();
    let start = if has_header { 1 } else { 0 };
    let name_idx = name_idx.unwrap_or(0);
    let email_idx = email_idx.unwrap_or(1);

    records[start..]
        .iter()
        .map(|cells| MemberRow {
            name: cells.get(name_idx).cloned().unwrap_or_default(),
            email: cells
                .get(email_idx)
                .map(|cell| cell.to_lowercase())
                .unwrap_or_default(),
        })
        .filter(|row| !row.email.is_empty())
        .collect()
}

pub async fn import_members(
    auth: &AuthUser,
    csv_text: &str,
    deps: &ServerDeps,
) -> Result<usize, ImportMembersError> {
    Actor::new(&auth.uid, &auth.email)
        .can(AdminCapability::ManageMembers)
        .check(deps)
        .await?;

    let rows = parse_member_rows(csv_text);
    if rows.is_empty() {
        return Err(ImportMembersError::Empty);
    }

    for row in &rows {
        ApprovedMember::upsert(
            &row.email,
            &row.name,
            MemberStatus::Approved,
            &auth.email,
            &deps.db_pool,
        )
        .await?;
    }

    info!(count = rows.len(), "Roster CSV imported");
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_japanese_headers() {
        let csv = "氏名,メールアドレス\n山田 太郎,Taro@Gmail.com\n";
        let rows = parse_member_rows(csv);
        assert_eq!(
            rows,
            vec![MemberRow {
                name: "山田 太郎".to_string(),
                email: "taro@gmail.com".to_string(),
            }]
        );
    }

    #[test]
    fn sniffs_english_headers_in_any_order() {
        let csv = "Email,Name\na@gmail.com,Alice\n";
        let rows = parse_member_rows(csv);
        assert_eq!(rows[0].name, "Alice");
        assert_eq!(rows[0].email, "a@gmail.com");
    }

    #[test]
    fn headerless_falls_back_to_first_two_columns() {
        let csv = "Alice,a@gmail.com\nBob,b@gmail.com\n";
        let rows = parse_member_rows(csv);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].email, "b@gmail.com");
    }

    #[test]
    fn drops_rows_without_email() {
        let csv = "name,email\nAlice,\n,b@gmail.com\n";
        let rows = parse_member_rows(csv);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].email, "b@gmail.com");
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(parse_member_rows("").is_empty());
        assert!(parse_member_rows("\n\n").is_empty());
    }
}
