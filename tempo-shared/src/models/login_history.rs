/// Sign-in audit log
///
/// Append-only: a row is recorded on every successful sign-in and never
/// updated or deleted (rows cascade away with their user).

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// One recorded sign-in
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LoginHistory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ip_address: String,
    pub user_agent: String,
    pub login_at: DateTime<Utc>,
}

impl LoginHistory {
    /// Appends a sign-in record
    pub async fn record(
        pool: &PgPool,
        user_id: Uuid,
        ip_address: &str,
        user_agent: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, LoginHistory>(
            r#"
            INSERT INTO login_history (user_id, ip_address, user_agent)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, ip_address, user_agent, login_at
            "#,
        )
        .bind(user_id)
        .bind(ip_address)
        .bind(user_agent)
        .fetch_one(pool)
        .await
    }

    /// Lists a user's sign-ins, newest first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, LoginHistory>(
            r#"
            SELECT id, user_id, ip_address, user_agent, login_at
            FROM login_history
            WHERE user_id = $1
            ORDER BY login_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Counts a user's sign-ins
    pub async fn count_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM login_history WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
