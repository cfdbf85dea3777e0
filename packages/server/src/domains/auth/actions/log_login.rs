//! Login audit logging action

use anyhow::Result;
use tracing::info;

use crate::domains::auth::models::LoginEvent;
use crate::kernel::ServerDeps;

pub async fn log_login(
    uid: &str,
    email: &str,
    ip: &str,
    user_agent: &str,
    deps: &ServerDeps,
) -> Result<LoginEvent> {
    let event = LoginEvent::insert(uid, email, ip, user_agent, &deps.db_pool).await?;
    info!(uid = %event.uid, ip = %event.ip, "Login recorded");
    Ok(event)
}
