//! Integration tests for the spreadsheet import orchestrator.
//!
//! The orchestrator composes a page document without persisting anything,
//! so these tests run against a mock fetcher and a lazy (never-connected)
//! pool. The caller is a configured admin email, which short-circuits the
//! storage lookup in the authorization check.

use std::sync::Arc;

use server_core::domains::auth::JwtService;
use server_core::domains::pages::ContentBody;
use server_core::domains::sheets::{import_sheet, ImportSource, SheetError};
use server_core::kernel::{MockSheetFetcher, ServerDeps};
use server_core::server::middleware::AuthUser;
use sqlx::PgPool;

fn test_deps(fetcher: MockSheetFetcher) -> ServerDeps {
    ServerDeps::new(
        PgPool::connect_lazy("postgres://localhost/unused").expect("lazy pool"),
        Arc::new(fetcher),
        Arc::new(JwtService::new("test_secret", "test_issuer".to_string())),
        vec!["admin@gmail.com".to_string()],
    )
}

fn admin() -> AuthUser {
    AuthUser {
        uid: "admin-uid".to_string(),
        email: "admin@gmail.com".to_string(),
        is_admin: true,
    }
}

const SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/1AbCdEfGh/edit#gid=5";

#[tokio::test]
async fn url_import_composes_a_table_page() {
    let fetcher = MockSheetFetcher::new().with_csv("名前,リンク,説明\nAlpha,https://example.com,短い文。\n");
    let deps = test_deps(fetcher);

    let page = import_sheet(&admin(), ImportSource::Url(SHEET_URL.to_string()), &deps)
        .await
        .expect("import should succeed");

    assert_eq!(page.slug, "sheet-1abcde-5");
    assert_eq!(page.title, "スプレッドシート取り込み");
    assert_eq!(page.source_key.as_deref(), Some("1AbCdEfGh:5"));
    assert!(!page.published);
    assert!(page.ord.is_some());
    assert!(page.parent_slug.is_none());

    // One section, one table item
    assert_eq!(page.sections.0.len(), 1);
    let section = &page.sections.0[0];
    assert_eq!(section.id, "sheet-table");
    assert_eq!(section.title, "一覧");
    let table = match &section.items[0].body {
        ContentBody::Table { table } => table,
        other => panic!("expected table item, got {other:?}"),
    };
    assert_eq!(table.headers, vec!["名前", "リンク", "説明"]);
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].cells.len(), table.headers.len());

    // The narrative column produced one detail page, stamped with the parent
    assert_eq!(page.detail_pages.len(), 1);
    let detail = &page.detail_pages[0];
    assert_eq!(detail.title, "Alpha");
    assert_eq!(detail.parent_slug.as_deref(), Some("sheet-1abcde-5"));
    assert_eq!(detail.source_key.as_deref(), Some("1AbCdEfGh:5"));
    assert_eq!(
        table.rows[0].detail_url.as_deref(),
        Some(format!("/dashboard/pages/{}", detail.slug).as_str())
    );
}

#[tokio::test]
async fn csv_text_import_has_no_source_key() {
    let deps = test_deps(MockSheetFetcher::new());

    let page = import_sheet(
        &admin(),
        ImportSource::CsvText("name,note\nAlpha,hello\n".to_string()),
        &deps,
    )
    .await
    .expect("import should succeed");

    assert!(page.source_key.is_none());
    assert!(page.slug.starts_with("sheet-csv-"));
    assert!(page.detail_pages.is_empty());
}

#[tokio::test]
async fn unrecognizable_url_is_rejected() {
    let deps = test_deps(MockSheetFetcher::new());

    let result = import_sheet(
        &admin(),
        ImportSource::Url("https://example.com/not-a-sheet".to_string()),
        &deps,
    )
    .await;

    assert!(matches!(result, Err(SheetError::BadUrl)));
}

#[tokio::test]
async fn fetch_failure_is_rejected() {
    let fetcher = MockSheetFetcher::new().with_failure("export endpoint down");
    let deps = test_deps(fetcher);

    let result = import_sheet(&admin(), ImportSource::Url(SHEET_URL.to_string()), &deps).await;

    assert!(matches!(result, Err(SheetError::FetchFailed)));
}

#[tokio::test]
async fn empty_tab_is_rejected() {
    let fetcher = MockSheetFetcher::new().with_csv("");
    let deps = test_deps(fetcher);

    let result = import_sheet(&admin(), ImportSource::Url(SHEET_URL.to_string()), &deps).await;

    assert!(matches!(result, Err(SheetError::EmptyTable)));
}

#[tokio::test]
async fn header_only_tab_is_rejected() {
    let fetcher = MockSheetFetcher::new().with_csv("名前,説明\n");
    let deps = test_deps(fetcher);

    let result = import_sheet(&admin(), ImportSource::Url(SHEET_URL.to_string()), &deps).await;

    assert!(matches!(result, Err(SheetError::EmptyTable)));
}

#[tokio::test]
async fn fetch_targets_the_requested_tab() {
    let fetcher = MockSheetFetcher::new().with_csv("a,b\n1,2\n");
    // Clones share the recorded-call state
    let handle = fetcher.clone();
    let deps = test_deps(fetcher);

    import_sheet(&admin(), ImportSource::Url(SHEET_URL.to_string()), &deps)
        .await
        .expect("import should succeed");

    assert_eq!(handle.calls(), vec!["1AbCdEfGh:5"]);
    assert!(handle.was_fetched("1AbCdEfGh:5"));
}
