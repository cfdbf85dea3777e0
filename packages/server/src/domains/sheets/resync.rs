//! Incremental re-sync engine
//!
//! Sweeps every top-level page that carries a source key, re-fetches the
//! live tab, and appends rows the stored table has not seen. Existing
//! rows are never edited, reordered or removed. The sweep is best-effort:
//! a failing page is skipped and the rest still run.

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::common::auth::{Actor, AdminCapability};
use crate::domains::pages::{ContentBody, Page, TableContent};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

use super::classify::build_rows;
use super::error::SheetError;
use super::parse::{parse_table, SheetTable};
use super::source::SheetRef;

/// Outcome of one sweep
#[derive(Debug, Clone, Serialize)]
pub struct ResyncReport {
    pub message: String,
    pub updated: usize,
    pub details: Vec<String>,
}

/// Snapshot rows the stored table has not seen yet.
///
/// Row identity is the trimmed first-column value; rows with an empty
/// first column are never treated as new.
pub fn plan_additions(existing: &TableContent, snapshot: &SheetTable) -> Vec<Vec<String>> {
    let existing_keys = existing.identity_keys();
    snapshot
        .rows
        .iter()
        .filter(|row| {
            let first = row.first().map(|cell| cell.trim()).unwrap_or("");
            !first.is_empty() && !existing_keys.contains(first)
        })
        .cloned()
        .collect()
}

/// Admin-triggered re-sync of all imported pages
pub async fn refresh_sheets(auth: &AuthUser, deps: &ServerDeps) -> Result<ResyncReport, SheetError> {
    Actor::new(&auth.uid, &auth.email)
        .can(AdminCapability::ImportSheets)
        .check(deps)
        .await?;

    run_resync_sweep(deps).await.map_err(SheetError::Internal)
}

/// The sweep itself: also invoked on a schedule without a caller.
pub async fn run_resync_sweep(deps: &ServerDeps) -> Result<ResyncReport> {
    let candidates = Page::find_source_pages(&deps.db_pool).await?;

    if candidates.is_empty() {
        return Ok(ResyncReport {
            message: "更新対象のページがありません。".to_string(),
            updated: 0,
            details: Vec::new(),
        });
    }

    let mut updated = 0usize;
    let mut details: Vec<String> = Vec::new();

    for page in candidates {
        match resync_page(&page, deps).await {
            Ok(Some(added)) => {
                updated += 1;
                details.push(format!("{}: {}行追加", page.title, added));
            }
            Ok(None) => {
                details.push(format!("{}: 変更なし", page.title));
            }
            Err(error) => {
                // Contain the failure to this page; the sweep moves on
                warn!(slug = %page.slug, %error, "Re-sync skipped page");
            }
        }
    }

    let message = if updated > 0 {
        format!("{updated}件のページを更新しました。")
    } else {
        "新しいデータはありませんでした。".to_string()
    };

    info!(updated, "Sheet re-sync sweep finished");
    Ok(ResyncReport {
        message,
        updated,
        details,
    })
}

/// Re-sync one page. `Ok(Some(n))` means n rows were appended, `Ok(None)`
/// no change; errors mean the page was skipped (bad source key, fetch or
/// parse failure, unexpected stored shape).
async fn resync_page(page: &Page, deps: &ServerDeps) -> Result<Option<usize>> {
    let source_key = page.source_key.as_deref().unwrap_or_default();
    let sheet = SheetRef::from_source_key(source_key)
        .ok_or_else(|| anyhow::anyhow!("malformed source key: {source_key}"))?;

    let csv_text = deps.sheet_fetcher.fetch_csv(&sheet).await?;
    let snapshot = parse_table(&csv_text);
    if snapshot.is_empty() {
        anyhow::bail!("tab is empty");
    }

    let existing = page
        .first_table()
        .ok_or_else(|| anyhow::anyhow!("stored page has no table"))?;

    let additions = plan_additions(existing, &snapshot);
    if additions.is_empty() {
        return Ok(None);
    }

    // Fallback titles keep counting from the stored row count
    let built = build_rows(
        &snapshot.headers,
        &additions,
        &page.slug,
        existing.rows.len(),
        page.published,
        Some(source_key),
    );

    let mut rows = existing.rows.clone();
    rows.extend(built.rows);
    let updated_table = TableContent {
        headers: snapshot.headers,
        rows,
    };

    // Only the table item is rewritten; the rest of the document is
    // copied through untouched
    let mut sections = page.sections.0.clone();
    let item = sections
        .first_mut()
        .and_then(|section| section.items.first_mut())
        .ok_or_else(|| anyhow::anyhow!("stored page has no table item"))?;
    item.body = ContentBody::Table {
        table: updated_table,
    };

    Page::update_sections(&page.slug, &sections, &deps.db_pool).await?;

    for detail in &built.detail_pages {
        detail.upsert(&deps.db_pool).await?;
    }

    let added = additions.len();
    info!(slug = %page.slug, added, "Appended re-synced rows");
    Ok(Some(added))
}
