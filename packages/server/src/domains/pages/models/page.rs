//! Page document model
//!
//! Pages are slug-keyed documents holding ordered sections of content
//! items. The nested structure is stored as one JSONB column; membership
//! metadata (published flag, ordering rank, source key) lives in plain
//! columns so queries can filter without unpacking the document.
//!
//! Wire shape matches the member-facing client: camelCase field names,
//! absent optional fields omitted entirely.

use std::collections::BTreeSet;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;

/// A single table cell. The tag is fixed at creation: cells are replaced
/// wholesale, never re-tagged in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TableCell {
    Text { value: String },
    Link { label: String, url: String },
}

impl TableCell {
    /// Row identity key: the first cell's visible text, trimmed.
    /// Link cells identify by label (falling back to URL), text cells by value.
    pub fn identity_key(&self) -> String {
        match self {
            TableCell::Text { value } => value.trim().to_string(),
            TableCell::Link { label, url } => {
                let label = label.trim();
                if label.is_empty() {
                    url.trim().to_string()
                } else {
                    label.to_string()
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
    #[serde(
        rename = "detailUrl",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub detail_url: Option<String>,
}

/// Tabular content: `rows[i].cells.len() == headers.len()` always.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableContent {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl TableContent {
    /// Identity keys of all current rows (empty first cells excluded)
    pub fn identity_keys(&self) -> BTreeSet<String> {
        self.rows
            .iter()
            .filter_map(|row| row.cells.first())
            .map(|cell| cell.identity_key())
            .filter(|key| !key.is_empty())
            .collect()
    }
}

/// Kind-specific payload of a content item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBody {
    Text {
        #[serde(default)]
        text: String,
    },
    Video {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        url: Option<String>,
        #[serde(
            rename = "storagePath",
            skip_serializing_if = "Option::is_none",
            default
        )]
        storage_path: Option<String>,
    },
    Audio {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        url: Option<String>,
        #[serde(
            rename = "storagePath",
            skip_serializing_if = "Option::is_none",
            default
        )]
        storage_path: Option<String>,
    },
    Url { url: String },
    Table { table: TableContent },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    #[serde(flatten)]
    pub body: ContentBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSection {
    pub id: String,
    pub title: String,
    pub items: Vec<ContentItem>,
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Page document
///
/// `detail_pages` is transient: it carries sub-pages synthesized by the
/// most recent import and is flushed as separate rows on save, never
/// stored as a column.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub sections: Json<Vec<PageSection>>,
    /// Ordering rank; lower sorts first, pages without one sort last
    #[serde(rename = "order", skip_serializing_if = "Option::is_none", default)]
    pub ord: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent_slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source_key: Option<String>,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub detail_pages: Vec<Page>,
    #[serde(default = "now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "now")]
    pub updated_at: DateTime<Utc>,
}

impl Page {
    /// The page's first table item, if its leading section holds one
    pub fn first_table(&self) -> Option<&TableContent> {
        self.sections.0.first().and_then(|section| {
            section.items.first().and_then(|item| match &item.body {
                ContentBody::Table { table } => Some(table),
                _ => None,
            })
        })
    }

    /// Slugs of every sub-page this page references: rows' detail URLs
    /// (last path segment) plus any transient detail pages.
    pub fn detail_slugs(&self) -> BTreeSet<String> {
        let mut slugs = BTreeSet::new();
        for section in &self.sections.0 {
            for item in &section.items {
                if let ContentBody::Table { table } = &item.body {
                    for row in &table.rows {
                        if let Some(url) = &row.detail_url {
                            if let Some(slug) = url.rsplit('/').next() {
                                if !slug.is_empty() {
                                    slugs.insert(slug.to_string());
                                }
                            }
                        }
                    }
                }
            }
        }
        for detail in &self.detail_pages {
            if !detail.slug.is_empty() {
                slugs.insert(detail.slug.clone());
            }
        }
        slugs
    }

    /// Find page by slug
    pub async fn find_by_slug(slug: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM pages WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// All pages, for the admin list
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM pages ORDER BY ord ASC NULLS LAST, updated_at ASC",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Published top-level pages in member-area order: rank ascending,
    /// unranked pages last, ties broken by update time.
    pub async fn find_visible(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM pages
             WHERE published = true AND parent_slug IS NULL
             ORDER BY ord ASC NULLS LAST, updated_at ASC",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Published page visible to members (top-level or detail)
    pub async fn find_published(slug: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM pages WHERE slug = $1 AND published = true",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Top-level pages imported from a spreadsheet (re-sync candidates)
    pub async fn find_source_pages(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM pages
             WHERE source_key IS NOT NULL AND source_key <> '' AND parent_slug IS NULL
             ORDER BY created_at ASC",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Slugs of all stored pages sharing a source key
    pub async fn find_slugs_by_source_key(source_key: &str, pool: &PgPool) -> Result<Vec<String>> {
        sqlx::query_scalar("SELECT slug FROM pages WHERE source_key = $1")
            .bind(source_key)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert or update this page, preserving `created_at` on update
    pub async fn upsert(&self, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO pages (slug, title, description, published, sections, ord, parent_slug, source_key)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (slug) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                published = EXCLUDED.published,
                sections = EXCLUDED.sections,
                ord = EXCLUDED.ord,
                parent_slug = EXCLUDED.parent_slug,
                source_key = EXCLUDED.source_key,
                updated_at = now()
             RETURNING *",
        )
        .bind(&self.slug)
        .bind(&self.title)
        .bind(&self.description)
        .bind(self.published)
        .bind(&self.sections)
        .bind(self.ord)
        .bind(&self.parent_slug)
        .bind(&self.source_key)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Replace a page's sections (re-sync table rewrite)
    pub async fn update_sections(
        slug: &str,
        sections: &[PageSection],
        pool: &PgPool,
    ) -> Result<()> {
        sqlx::query("UPDATE pages SET sections = $2, updated_at = now() WHERE slug = $1")
            .bind(slug)
            .bind(Json(sections))
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete a single page row
    pub async fn delete(slug: &str, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM pages WHERE slug = $1")
            .bind(slug)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete every page whose parent is `slug`
    pub async fn delete_by_parent_slug(slug: &str, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM pages WHERE parent_slug = $1")
            .bind(slug)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete a batch of pages by slug
    pub async fn delete_many(slugs: &[String], pool: &PgPool) -> Result<u64> {
        if slugs.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM pages WHERE slug = ANY($1)")
            .bind(slugs)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(label: &str, url: &str) -> TableCell {
        TableCell::Link {
            label: label.to_string(),
            url: url.to_string(),
        }
    }

    fn text(value: &str) -> TableCell {
        TableCell::Text {
            value: value.to_string(),
        }
    }

    #[test]
    fn cell_serialization_is_tagged() {
        let cell = link("開く", "https://example.com");
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "link", "label": "開く", "url": "https://example.com"})
        );

        let cell = text("hello");
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json, serde_json::json!({"type": "text", "value": "hello"}));
    }

    #[test]
    fn absent_detail_url_is_omitted() {
        let row = TableRow {
            cells: vec![text("a")],
            detail_url: None,
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(!json.contains("detailUrl"));

        let row = TableRow {
            cells: vec![text("a")],
            detail_url: Some("/dashboard/pages/x".to_string()),
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"detailUrl\":\"/dashboard/pages/x\""));
    }

    #[test]
    fn content_item_round_trip() {
        let item = ContentItem {
            id: "sheet-table-item".to_string(),
            title: None,
            body: ContentBody::Table {
                table: TableContent {
                    headers: vec!["名前".to_string()],
                    rows: vec![TableRow {
                        cells: vec![text("Alpha")],
                        detail_url: None,
                    }],
                },
            },
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"type\":\"table\""));
        let back: ContentItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn identity_keys_skip_empty_first_cells() {
        let table = TableContent {
            headers: vec!["名前".to_string(), "説明".to_string()],
            rows: vec![
                TableRow {
                    cells: vec![text(" Alpha "), text("x")],
                    detail_url: None,
                },
                TableRow {
                    cells: vec![text("   "), text("y")],
                    detail_url: None,
                },
                TableRow {
                    cells: vec![link("Beta", "https://example.com"), text("z")],
                    detail_url: None,
                },
            ],
        };
        let keys = table.identity_keys();
        assert_eq!(
            keys.into_iter().collect::<Vec<_>>(),
            vec!["Alpha".to_string(), "Beta".to_string()]
        );
    }

    #[test]
    fn detail_slugs_come_from_rows_and_transient_pages() {
        let mut page = Page {
            slug: "parent".to_string(),
            title: "t".to_string(),
            description: None,
            published: false,
            sections: Json(vec![PageSection {
                id: "sheet-table".to_string(),
                title: "一覧".to_string(),
                items: vec![ContentItem {
                    id: "sheet-table-item".to_string(),
                    title: None,
                    body: ContentBody::Table {
                        table: TableContent {
                            headers: vec!["名前".to_string()],
                            rows: vec![TableRow {
                                cells: vec![text("Alpha")],
                                detail_url: Some("/dashboard/pages/alpha-detail".to_string()),
                            }],
                        },
                    },
                }],
            }]),
            ord: None,
            parent_slug: None,
            source_key: None,
            detail_pages: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        page.detail_pages = vec![Page {
            slug: "beta-detail".to_string(),
            detail_pages: Vec::new(),
            ..page.clone()
        }];

        let slugs: Vec<String> = page.detail_slugs().into_iter().collect();
        assert_eq!(slugs, vec!["alpha-detail".to_string(), "beta-detail".to_string()]);
    }
}
