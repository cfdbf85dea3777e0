//! Application review actions
//!
//! Approving an application also places the email on the approved roster,
//! which is what the login check reads. Rejection only marks the
//! application; the roster is untouched.

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::common::auth::{Actor, AdminCapability, AuthError};
use crate::domains::members::models::{Application, ApprovedMember, MemberStatus};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Application not found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub async fn approve_application(
    auth: &AuthUser,
    application_id: Uuid,
    deps: &ServerDeps,
) -> Result<Application, ReviewError> {
    Actor::new(&auth.uid, &auth.email)
        .can(AdminCapability::ManageMembers)
        .check(deps)
        .await?;

    let Some(application) = Application::find_by_id(application_id, &deps.db_pool).await? else {
        return Err(ReviewError::NotFound);
    };

    let approved = Application::mark_approved(application.id, &deps.db_pool).await?;
    ApprovedMember::upsert(
        &approved.email,
        &approved.name,
        MemberStatus::Approved,
        &auth.email,
        &deps.db_pool,
    )
    .await?;

    info!(email = %approved.email, "Application approved");
    Ok(approved)
}

pub async fn reject_application(
    auth: &AuthUser,
    application_id: Uuid,
    deps: &ServerDeps,
) -> Result<Application, ReviewError> {
    Actor::new(&auth.uid, &auth.email)
        .can(AdminCapability::ManageMembers)
        .check(deps)
        .await?;

    let Some(application) = Application::find_by_id(application_id, &deps.db_pool).await? else {
        return Err(ReviewError::NotFound);
    };

    let rejected =
        Application::mark_rejected(application.id, &auth.email, &deps.db_pool).await?;

    info!(email = %rejected.email, "Application rejected");
    Ok(rejected)
}
