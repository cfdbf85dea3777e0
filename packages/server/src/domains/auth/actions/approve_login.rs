//! Login approval action
//!
//! A verified identity may only enter the member area if its email is on
//! the approved roster (or is a configured admin email). Approval upserts
//! the account profile; admin logins also self-seed the roster so the
//! member list stays complete.

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use crate::domains::auth::models::UserProfile;
use crate::domains::members::models::ApprovedMember;
use crate::kernel::ServerDeps;

#[derive(Error, Debug)]
pub enum LoginError {
    #[error("Only Gmail accounts are accepted")]
    NotGmail,

    #[error("Membership not approved")]
    NotApproved,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Verified identity attempting to enter the member area
pub struct LoginIdentity {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

pub async fn approve_login(
    identity: LoginIdentity,
    deps: &ServerDeps,
) -> Result<UserProfile, LoginError> {
    let email = identity.email.trim().to_lowercase();
    if !email.ends_with("@gmail.com") {
        return Err(LoginError::NotGmail);
    }

    let is_admin_email = deps.admin_emails.iter().any(|value| value == &email);

    let roster_approved = ApprovedMember::is_approved(&email, &deps.db_pool).await?;
    if !roster_approved && !is_admin_email {
        return Err(LoginError::NotApproved);
    }

    let profile = UserProfile {
        uid: identity.uid.clone(),
        email: email.clone(),
        display_name: identity.display_name,
        photo_url: identity.photo_url,
        is_approved: true,
        is_admin: is_admin_email,
        created_at: Utc::now(),
        approved_at: Some(Utc::now()),
    }
    .upsert(&deps.db_pool)
    .await?;

    // Admin emails are approved by configuration; reflect that in the roster
    if is_admin_email {
        ApprovedMember::seed_admin(&email, &deps.db_pool).await?;
    }

    info!(uid = %profile.uid, admin = profile.is_admin, "Login approved");
    Ok(profile)
}
