/// Board task model
///
/// A board task lives in exactly one column of a project. Subtasks and
/// comments are embedded JSONB documents; label references are by-id and may
/// dangle after a label is deleted, so readers hydrate them through
/// [`Label::find_by_ids`](crate::models::label::Label::find_by_ids) which
/// silently drops missing ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::task::Subtask;

/// An embedded comment on a board task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(user_id: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            content,
            created_at: Utc::now(),
        }
    }
}

const PROJECT_TASK_COLUMNS: &str = "id, project_id, column_id, title, short_description, \
     detailed_description, labels, attachments, subtasks, comments, email_reminder, \
     position, created_at, updated_at";

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTask {
    pub id: Uuid,
    pub project_id: Uuid,
    pub column_id: Uuid,
    pub title: String,
    pub short_description: Option<String>,
    pub detailed_description: Option<String>,
    /// Raw label ids; API responses replace this with hydrated labels
    #[serde(skip_serializing)]
    pub labels: Vec<Uuid>,
    pub attachments: Vec<String>,
    pub subtasks: Json<Vec<Subtask>>,
    /// Raw comments; API responses replace this with author-hydrated views
    #[serde(skip_serializing)]
    pub comments: Json<Vec<Comment>>,
    pub email_reminder: Option<DateTime<Utc>>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a board task
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectTask {
    pub title: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub detailed_description: Option<String>,
    #[serde(default)]
    pub labels: Vec<Uuid>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default)]
    pub email_reminder: Option<DateTime<Utc>>,
}

impl ProjectTask {
    /// Creates a board task at the bottom of its column
    ///
    /// Position is `MAX(position) + 1` over the column, computed inside the
    /// insert so concurrent appends land in distinct slots.
    pub async fn create(
        pool: &PgPool,
        project_id: Uuid,
        column_id: Uuid,
        input: CreateProjectTask,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO project_tasks
                (project_id, column_id, title, short_description, detailed_description,
                 labels, subtasks, email_reminder, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8,
                    (SELECT COALESCE(MAX(position), -1) + 1 FROM project_tasks WHERE column_id = $2))
            RETURNING {PROJECT_TASK_COLUMNS}
            "#,
        );

        sqlx::query_as::<_, ProjectTask>(&sql)
            .bind(project_id)
            .bind(column_id)
            .bind(&input.title)
            .bind(&input.short_description)
            .bind(&input.detailed_description)
            .bind(&input.labels)
            .bind(Json(&input.subtasks))
            .bind(input.email_reminder)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {PROJECT_TASK_COLUMNS} FROM project_tasks WHERE id = $1");

        sqlx::query_as::<_, ProjectTask>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists all of a project's board tasks in column order
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {PROJECT_TASK_COLUMNS} FROM project_tasks \
             WHERE project_id = $1 ORDER BY column_id, position ASC",
        );

        sqlx::query_as::<_, ProjectTask>(&sql)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Lists one column's board tasks, top to bottom
    pub async fn list_for_column(
        pool: &PgPool,
        column_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {PROJECT_TASK_COLUMNS} FROM project_tasks \
             WHERE column_id = $1 ORDER BY position ASC",
        );

        sqlx::query_as::<_, ProjectTask>(&sql)
            .bind(column_id)
            .fetch_all(pool)
            .await
    }

    /// Persists every mutable column from the in-memory task
    ///
    /// Callers load, mutate fields, then save. Moving a task across columns
    /// is just a `column_id`/`position` rewrite followed by save;
    /// last-write-wins under concurrency.
    pub async fn save(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE project_tasks SET
                column_id = $2,
                title = $3,
                short_description = $4,
                detailed_description = $5,
                labels = $6,
                attachments = $7,
                subtasks = $8,
                comments = $9,
                email_reminder = $10,
                position = $11,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PROJECT_TASK_COLUMNS}
            "#,
        );

        sqlx::query_as::<_, ProjectTask>(&sql)
            .bind(self.id)
            .bind(self.column_id)
            .bind(&self.title)
            .bind(&self.short_description)
            .bind(&self.detailed_description)
            .bind(&self.labels)
            .bind(&self.attachments)
            .bind(&self.subtasks)
            .bind(&self.comments)
            .bind(self.email_reminder)
            .bind(self.position)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts all board tasks
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM project_tasks")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_new_sets_fresh_id() {
        let user = Uuid::new_v4();
        let a = Comment::new(user, "first".into());
        let b = Comment::new(user, "second".into());
        assert_ne!(a.id, b.id);
        assert_eq!(a.user_id, user);
    }

    #[test]
    fn test_comment_deserialize_defaults_id() {
        let json = r#"{"userId":"7f4df2b2-4254-4f39-91a4-9e0a51fcb0d4",
                       "content":"looks good",
                       "createdAt":"2026-01-05T10:00:00Z"}"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.content, "looks good");
        assert!(!comment.id.is_nil());
    }
}
