/// Authorization module for the members site
///
/// Provides a fluent API for authorization checks in action code:
///
/// ```rust,ignore
/// use crate::common::auth::{Actor, AdminCapability};
///
/// Actor::new(&auth.uid, &auth.email)
///     .can(AdminCapability::ImportSheets)
///     .check(&deps)
///     .await?;
/// ```
///
/// This keeps authorization in the action layer where it belongs, not in
/// the HTTP handler layer. The caller is always an explicit value, never
/// ambient state.

mod errors;
mod capability;
mod builder;

pub use errors::AuthError;
pub use capability::AdminCapability;
pub use builder::{Actor, CapabilityBuilder, HasAuthContext};
