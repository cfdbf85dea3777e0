use sqlx::PgPool;

use super::{AdminCapability, AuthError};

/// Entry point for authorization checks
///
/// Usage:
/// ```rust,ignore
/// Actor::new(&auth.uid, &auth.email)
///     .can(AdminCapability::ManagePages)
///     .check(&deps)
///     .await?;
/// ```
pub struct Actor<'a> {
    uid: &'a str,
    email: &'a str,
}

impl<'a> Actor<'a> {
    /// Create a new actor for authorization checks.
    ///
    /// `uid` and `email` come from a verified session token; the admin flag
    /// itself is looked up at check time, not trusted from the caller.
    pub fn new(uid: &'a str, email: &'a str) -> Self {
        Self { uid, email }
    }

    /// Specify what capability the actor needs
    pub fn can(self, capability: AdminCapability) -> CapabilityBuilder<'a> {
        CapabilityBuilder {
            uid: self.uid,
            email: self.email,
            capability,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityBuilder<'a> {
    uid: &'a str,
    email: &'a str,
    capability: AdminCapability,
}

impl<'a> CapabilityBuilder<'a> {
    /// Perform the authorization check
    pub async fn check<D>(self, deps: &D) -> Result<(), AuthError>
    where
        D: HasAuthContext,
    {
        check_admin_permission(self.uid, self.email, self.capability, deps).await
    }
}

/// Trait for dependencies that can perform auth checks
pub trait HasAuthContext: Send + Sync {
    fn db_pool(&self) -> &PgPool;
    fn admin_emails(&self) -> &[String];
}

/// Core permission check function
///
/// Admin status is resolved per call: either the actor's email is in the
/// configured admin list, or their stored profile carries the admin flag.
/// The session token is only trusted for identity, so revoking the flag in
/// storage takes effect on the next request rather than at token expiry.
async fn check_admin_permission<D>(
    uid: &str,
    email: &str,
    _capability: AdminCapability,
    deps: &D,
) -> Result<(), AuthError>
where
    D: HasAuthContext,
{
    if uid.is_empty() {
        return Err(AuthError::AuthenticationRequired);
    }

    let email = email.trim().to_lowercase();
    if deps.admin_emails().iter().any(|value| value == &email) {
        return Ok(());
    }

    let is_admin: Option<bool> =
        sqlx::query_scalar("SELECT is_admin FROM users WHERE uid = $1")
            .bind(uid)
            .fetch_optional(deps.db_pool())
            .await?;

    if is_admin != Some(true) {
        return Err(AuthError::AdminRequired);
    }

    Ok(())
}
