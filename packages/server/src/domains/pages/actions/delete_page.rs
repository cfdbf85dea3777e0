//! Cascade page deletion
//!
//! Deleting a page takes its synthesized sub-pages with it: everything
//! referenced by its table rows' detail URLs, and everything whose
//! parent slug points back at it.

use thiserror::Error;
use tracing::info;

use crate::common::auth::{Actor, AdminCapability, AuthError};
use crate::domains::pages::Page;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

#[derive(Error, Debug)]
pub enum DeleteError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Page not found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub async fn delete_page(
    auth: &AuthUser,
    slug: &str,
    deps: &ServerDeps,
) -> Result<u64, DeleteError> {
    Actor::new(&auth.uid, &auth.email)
        .can(AdminCapability::ManagePages)
        .check(deps)
        .await?;

    let Some(page) = Page::find_by_slug(slug, &deps.db_pool).await? else {
        return Err(DeleteError::NotFound);
    };

    let detail_slugs: Vec<String> = page.detail_slugs().into_iter().collect();

    let mut removed = Page::delete(&page.slug, &deps.db_pool).await?;
    removed += Page::delete_many(&detail_slugs, &deps.db_pool).await?;
    removed += Page::delete_by_parent_slug(&page.slug, &deps.db_pool).await?;

    info!(slug = %page.slug, removed, "Page deleted with sub-pages");
    Ok(removed)
}
