//! Import orchestrator
//!
//! Turns a spreadsheet URL or pasted CSV into a page document with a
//! single table section. Nothing is persisted here: the composed page
//! (detail sub-pages included) goes back to the admin for review and an
//! explicit save.

use chrono::Utc;
use sqlx::types::Json;
use tracing::info;

use crate::common::auth::{Actor, AdminCapability};
use crate::domains::pages::{ContentBody, ContentItem, Page, PageSection, TableContent};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

use super::classify::build_rows;
use super::error::SheetError;
use super::parse::parse_table;
use super::slug::slugify;
use super::source::SheetRef;

/// What the admin handed us
pub enum ImportSource {
    Url(String),
    CsvText(String),
}

pub async fn import_sheet(
    auth: &AuthUser,
    source: ImportSource,
    deps: &ServerDeps,
) -> Result<Page, SheetError> {
    Actor::new(&auth.uid, &auth.email)
        .can(AdminCapability::ImportSheets)
        .check(deps)
        .await?;

    let (csv_text, source_key, slug_base) = match source {
        ImportSource::Url(url) => {
            let Some(sheet) = SheetRef::from_url(&url) else {
                return Err(SheetError::BadUrl);
            };
            let csv_text = deps
                .sheet_fetcher
                .fetch_csv(&sheet)
                .await
                .map_err(|_| SheetError::FetchFailed)?;
            let slug_base = sheet.slug_base();
            (csv_text, Some(sheet.source_key()), slug_base)
        }
        ImportSource::CsvText(text) => {
            let slug_base = slugify(&format!("sheet-csv-{}", Utc::now().timestamp_millis()));
            (text, None, slug_base)
        }
    };

    let table = parse_table(&csv_text);
    if table.is_empty() {
        return Err(SheetError::EmptyTable);
    }

    let built = build_rows(
        &table.headers,
        &table.rows,
        &slug_base,
        0,
        false,
        source_key.as_deref(),
    );

    let now = Utc::now();
    let page = Page {
        slug: slug_base,
        title: "スプレッドシート取り込み".to_string(),
        description: Some("スプレッドシートの内容を一覧にしました。".to_string()),
        published: false,
        sections: Json(vec![PageSection {
            id: "sheet-table".to_string(),
            title: "一覧".to_string(),
            items: vec![ContentItem {
                id: "sheet-table-item".to_string(),
                title: None,
                body: ContentBody::Table {
                    table: TableContent {
                        headers: table.headers,
                        rows: built.rows,
                    },
                },
            }],
        }]),
        ord: Some(now.timestamp_millis()),
        parent_slug: None,
        source_key,
        detail_pages: built.detail_pages,
        created_at: now,
        updated_at: now,
    };

    info!(
        slug = %page.slug,
        rows = page.first_table().map(|t| t.rows.len()).unwrap_or(0),
        details = page.detail_pages.len(),
        "Sheet imported"
    );
    Ok(page)
}
