use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Account profile - created the first time a login is approved
///
/// `is_approved` gates access to published pages; `is_admin` gates the
/// admin operations and is re-checked in storage on every admin call.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub is_approved: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Find profile by account identifier
    pub async fn find_by_uid(uid: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE uid = $1")
            .bind(uid)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Upsert a profile after a successful login approval
    pub async fn upsert(&self, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO users (uid, email, display_name, photo_url, is_approved, is_admin, approved_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (uid) DO UPDATE SET
                email = EXCLUDED.email,
                display_name = EXCLUDED.display_name,
                photo_url = EXCLUDED.photo_url,
                is_approved = EXCLUDED.is_approved,
                is_admin = EXCLUDED.is_admin,
                approved_at = EXCLUDED.approved_at
             RETURNING *",
        )
        .bind(&self.uid)
        .bind(&self.email)
        .bind(&self.display_name)
        .bind(&self.photo_url)
        .bind(self.is_approved)
        .bind(self.is_admin)
        .bind(self.approved_at)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
