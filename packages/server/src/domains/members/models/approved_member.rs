use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Roster status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Pending,
    Approved,
    Suspended,
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberStatus::Pending => write!(f, "pending"),
            MemberStatus::Approved => write!(f, "approved"),
            MemberStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for MemberStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(MemberStatus::Pending),
            "approved" => Ok(MemberStatus::Approved),
            "suspended" => Ok(MemberStatus::Suspended),
            _ => Err(anyhow::anyhow!("Invalid member status: {}", s)),
        }
    }
}

/// Approved-member roster entry, keyed by email
///
/// `approved` is derived from `status` on every write; the login check
/// reads only this flag.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedMember {
    pub email: String,
    pub name: String,
    pub status: String,
    pub approved: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ApprovedMember {
    /// Whether an email is currently approved for login
    pub async fn is_approved(email: &str, pool: &PgPool) -> Result<bool> {
        let approved: Option<bool> =
            sqlx::query_scalar("SELECT approved FROM approved_members WHERE email = $1")
                .bind(email)
                .fetch_optional(pool)
                .await?;
        Ok(approved == Some(true))
    }

    /// Full roster, most recently updated first
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM approved_members ORDER BY updated_at DESC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Upsert a roster entry with the given status
    pub async fn upsert(
        email: &str,
        name: &str,
        status: MemberStatus,
        approved_by: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let approved = status == MemberStatus::Approved;
        sqlx::query_as::<_, Self>(
            "INSERT INTO approved_members (email, name, status, approved, approved_at, approved_by)
             VALUES ($1, $2, $3, $4, CASE WHEN $4 THEN now() END, $5)
             ON CONFLICT (email) DO UPDATE SET
                name = EXCLUDED.name,
                status = EXCLUDED.status,
                approved = EXCLUDED.approved,
                approved_at = CASE WHEN EXCLUDED.approved THEN now() END,
                approved_by = EXCLUDED.approved_by,
                updated_at = now()
             RETURNING *",
        )
        .bind(email)
        .bind(name)
        .bind(status.to_string())
        .bind(approved)
        .bind(approved_by)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Seed an approved entry for a configured admin email
    pub async fn seed_admin(email: &str, pool: &PgPool) -> Result<()> {
        sqlx::query(
            "INSERT INTO approved_members (email, name, status, approved, approved_at, approved_by)
             VALUES ($1, '', 'approved', true, now(), 'system-admin-seed')
             ON CONFLICT (email) DO UPDATE SET
                approved = true,
                status = 'approved',
                updated_at = now()",
        )
        .bind(email)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove a roster entry
    pub async fn delete(email: &str, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM approved_members WHERE email = $1")
            .bind(email)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trip() {
        for status in [
            MemberStatus::Pending,
            MemberStatus::Approved,
            MemberStatus::Suspended,
        ] {
            assert_eq!(MemberStatus::from_str(&status.to_string()).unwrap(), status);
        }
    }
}
