/// Board column model
///
/// Columns partition a project board. Each column carries an integer
/// `position`; new columns append to the right by taking the current maximum
/// position plus one, computed inside the insert statement so concurrent
/// appends can't race to the same slot.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Column {
    /// Creates a column at the end of the project's column list
    pub async fn create(
        pool: &PgPool,
        project_id: Uuid,
        name: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Column>(
            r#"
            INSERT INTO columns (project_id, name, position)
            VALUES ($1, $2,
                    (SELECT COALESCE(MAX(position), -1) + 1 FROM columns WHERE project_id = $1))
            RETURNING id, project_id, name, position, created_at, updated_at
            "#,
        )
        .bind(project_id)
        .bind(name)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Column>(
            "SELECT id, project_id, name, position, created_at, updated_at \
             FROM columns WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists a project's columns in board order
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Column>(
            "SELECT id, project_id, name, position, created_at, updated_at \
             FROM columns WHERE project_id = $1 ORDER BY position ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Persists name and position. Position overwrites are last-write-wins;
    /// callers reorder by rewriting positions, not by shifting neighbors.
    pub async fn save(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Column>(
            r#"
            UPDATE columns SET name = $2, position = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, project_id, name, position, created_at, updated_at
            "#,
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(self.position)
        .fetch_one(pool)
        .await
    }

    /// Deletes a column; its board tasks cascade away with it
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM columns WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
