use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Login audit log entry - append-only
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct LoginEvent {
    pub id: Uuid,
    pub uid: String,
    pub email: String,
    pub ip: String,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
}

impl LoginEvent {
    /// Record a login
    pub async fn insert(
        uid: &str,
        email: &str,
        ip: &str,
        user_agent: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO login_events (uid, email, ip, user_agent)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(uid)
        .bind(email)
        .bind(ip)
        .bind(user_agent)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Most recent logins, newest first
    pub async fn find_recent(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM login_events ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
