//! Join application submission
//!
//! The only unauthenticated write on the site. Applications are keyed by
//! email, so re-applying refreshes the pending entry instead of piling up
//! duplicates.

use thiserror::Error;
use tracing::info;

use crate::domains::members::models::Application;
use crate::kernel::ServerDeps;

#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("Name and email are required")]
    MissingFields,

    #[error("Only Gmail accounts are accepted")]
    NotGmail,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub async fn apply(name: &str, email: &str, deps: &ServerDeps) -> Result<Application, ApplyError> {
    let name = name.trim();
    let email = email.trim().to_lowercase();
    if name.is_empty() || email.is_empty() {
        return Err(ApplyError::MissingFields);
    }
    if !email.ends_with("@gmail.com") {
        return Err(ApplyError::NotGmail);
    }

    let application = Application::submit(name, &email, &deps.db_pool).await?;
    info!(email = %application.email, "Join application received");
    Ok(application)
}
