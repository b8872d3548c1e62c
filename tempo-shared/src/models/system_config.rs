/// Application-wide settings singleton
///
/// One row, keyed by a boolean primary key pinned to TRUE. Readers get-or-
/// create it with defaults; admin writes overwrite it and stamp the editor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "app_theme", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppTheme {
    Light,
    Dark,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfig {
    #[serde(skip_serializing)]
    pub id: bool,
    pub app_name: String,
    pub theme: AppTheme,
    pub primary_color: String,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

/// Admin-writable settings fields
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSystemConfig {
    pub app_name: Option<String>,
    pub theme: Option<AppTheme>,
    pub primary_color: Option<String>,
}

impl SystemConfig {
    /// Returns the settings row, inserting the defaults if none exists yet
    pub async fn get_or_create(pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, SystemConfig>(
            r#"
            INSERT INTO system_config (id) VALUES (TRUE)
            ON CONFLICT (id) DO UPDATE SET id = TRUE
            RETURNING id, app_name, theme, primary_color, updated_by, updated_at
            "#,
        )
        .fetch_one(pool)
        .await
    }

    /// Applies the provided fields and records who changed them
    pub async fn update(
        pool: &PgPool,
        changes: UpdateSystemConfig,
        updated_by: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let current = Self::get_or_create(pool).await?;

        sqlx::query_as::<_, SystemConfig>(
            r#"
            UPDATE system_config SET
                app_name = $1,
                theme = $2,
                primary_color = $3,
                updated_by = $4,
                updated_at = NOW()
            WHERE id = TRUE
            RETURNING id, app_name, theme, primary_color, updated_by, updated_at
            "#,
        )
        .bind(changes.app_name.unwrap_or(current.app_name))
        .bind(changes.theme.unwrap_or(current.theme))
        .bind(changes.primary_color.unwrap_or(current.primary_color))
        .bind(updated_by)
        .fetch_one(pool)
        .await
    }
}
