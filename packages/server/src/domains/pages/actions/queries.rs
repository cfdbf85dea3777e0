//! Page queries
//!
//! Members see published pages only, and only after their profile is
//! approved; admins see everything.

use anyhow::Result;
use tracing::debug;

use crate::common::auth::{Actor, AdminCapability, AuthError};
use crate::domains::auth::models::UserProfile;
use crate::domains::pages::Page;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

async fn require_approved(auth: &AuthUser, deps: &ServerDeps) -> Result<(), AuthError> {
    let profile = UserProfile::find_by_uid(&auth.uid, &deps.db_pool)
        .await
        .map_err(AuthError::InternalError)?;
    match profile {
        Some(profile) if profile.is_approved => Ok(()),
        _ => Err(AuthError::NotApproved),
    }
}

/// Published top-level pages for the member area
pub async fn list_member_pages(auth: &AuthUser, deps: &ServerDeps) -> Result<Vec<Page>, AuthError> {
    require_approved(auth, deps).await?;
    let pages = Page::find_visible(&deps.db_pool)
        .await
        .map_err(AuthError::InternalError)?;
    debug!(count = pages.len(), "Listed member pages");
    Ok(pages)
}

/// A single published page (top-level or detail)
pub async fn get_member_page(
    auth: &AuthUser,
    slug: &str,
    deps: &ServerDeps,
) -> Result<Option<Page>, AuthError> {
    require_approved(auth, deps).await?;
    Page::find_published(slug, &deps.db_pool)
        .await
        .map_err(AuthError::InternalError)
}

/// Every page, for the admin list
pub async fn list_admin_pages(auth: &AuthUser, deps: &ServerDeps) -> Result<Vec<Page>, AuthError> {
    Actor::new(&auth.uid, &auth.email)
        .can(AdminCapability::ManagePages)
        .check(deps)
        .await?;
    Page::find_all(&deps.db_pool)
        .await
        .map_err(AuthError::InternalError)
}
