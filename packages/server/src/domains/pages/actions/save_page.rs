//! Save a composed page document
//!
//! Import returns documents without persisting them; this action is the
//! explicit save. The parent is upserted first, then every transient
//! detail page. When the parent was imported from a sheet, stored pages
//! sharing its source key that are no longer referenced get pruned, so a
//! re-import does not leave orphaned detail pages behind.

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use crate::common::auth::{Actor, AdminCapability, AuthError};
use crate::domains::pages::Page;
use crate::domains::sheets::slugify;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Page slug is required")]
    MissingSlug,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub async fn save_page(
    auth: &AuthUser,
    mut page: Page,
    deps: &ServerDeps,
) -> Result<Page, SaveError> {
    Actor::new(&auth.uid, &auth.email)
        .can(AdminCapability::ManagePages)
        .check(deps)
        .await?;

    let slug = {
        let trimmed = page.slug.trim();
        if trimmed.is_empty() {
            slugify(&page.title)
        } else {
            trimmed.to_string()
        }
    };
    if slug.is_empty() {
        return Err(SaveError::MissingSlug);
    }
    page.slug = slug.clone();

    let referenced = page.detail_slugs();

    // Prune stale pages from an earlier import of the same sheet
    if let Some(source_key) = page.source_key.as_deref().filter(|key| !key.is_empty()) {
        let stored = Page::find_slugs_by_source_key(source_key, &deps.db_pool).await?;
        let stale: Vec<String> = stored
            .into_iter()
            .filter(|candidate| candidate != &slug && !referenced.contains(candidate))
            .collect();
        if !stale.is_empty() {
            let pruned = Page::delete_many(&stale, &deps.db_pool).await?;
            info!(slug = %slug, pruned, "Pruned stale source pages");
        }
    }

    let detail_pages = std::mem::take(&mut page.detail_pages);
    if page.ord.is_none() {
        page.ord = Some(Utc::now().timestamp_millis());
    }

    let saved = page.upsert(&deps.db_pool).await?;

    for mut detail in detail_pages {
        if detail.slug.trim().is_empty() {
            detail.slug = slugify(&detail.title);
        }
        if detail.slug.is_empty() {
            continue;
        }
        detail.published = saved.published;
        detail.parent_slug = Some(saved.slug.clone());
        detail.source_key = saved.source_key.clone();
        if detail.ord.is_none() {
            detail.ord = saved.ord;
        }
        detail.upsert(&deps.db_pool).await?;
    }

    info!(slug = %saved.slug, "Page saved");
    Ok(saved)
}
