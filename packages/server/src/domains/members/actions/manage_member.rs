//! Roster management actions

use anyhow::Result;
use tracing::info;

use crate::common::auth::{Actor, AdminCapability, AuthError};
use crate::domains::members::models::{ApprovedMember, MemberStatus};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

pub async fn upsert_member(
    auth: &AuthUser,
    email: &str,
    name: &str,
    status: MemberStatus,
    deps: &ServerDeps,
) -> Result<ApprovedMember, AuthError> {
    Actor::new(&auth.uid, &auth.email)
        .can(AdminCapability::ManageMembers)
        .check(deps)
        .await?;

    let email = email.trim().to_lowercase();
    let member =
        ApprovedMember::upsert(&email, name.trim(), status, &auth.email, &deps.db_pool)
            .await
            .map_err(AuthError::InternalError)?;

    info!(email = %member.email, status = %member.status, "Roster entry updated");
    Ok(member)
}

pub async fn delete_member(
    auth: &AuthUser,
    email: &str,
    deps: &ServerDeps,
) -> Result<u64, AuthError> {
    Actor::new(&auth.uid, &auth.email)
        .can(AdminCapability::ManageMembers)
        .check(deps)
        .await?;

    let email = email.trim().to_lowercase();
    let removed = ApprovedMember::delete(&email, &deps.db_pool)
        .await
        .map_err(AuthError::InternalError)?;

    info!(email = %email, removed, "Roster entry deleted");
    Ok(removed)
}
