/// Project model and membership
///
/// A project is owned by one user and shared with members, each holding one
/// of two roles: `editor` (may mutate board structure) or `viewer` (may read
/// and comment). Columns and board tasks hang off a project via foreign keys
/// with `ON DELETE CASCADE`, so deleting a project removes its whole board
/// atomically.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE project_members (
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role member_role NOT NULL DEFAULT 'editor',
///     joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (project_id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

/// The two project-membership roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Read and comment only
    Viewer,

    /// Full board mutation rights
    Editor,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Viewer => "viewer",
            MemberRole::Editor => "editor",
        }
    }
}

/// A project (Kanban board)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An owner with their project count, for the admin statistics
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OwnerCount {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub project_count: i64,
}

/// One membership row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

impl Project {
    pub async fn create(
        pool: &PgPool,
        owner_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, owner_id, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            "SELECT id, name, description, owner_id, created_at, updated_at FROM projects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a project the given user can at least read (owner or member)
    ///
    /// Returns `None` both when the project doesn't exist and when the user
    /// has no access to it, so unauthorized lookups read as 404.
    pub async fn find_accessible(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            SELECT p.id, p.name, p.description, p.owner_id, p.created_at, p.updated_at
            FROM projects p
            WHERE p.id = $1
              AND (p.owner_id = $2
                   OR EXISTS (SELECT 1 FROM project_members m
                              WHERE m.project_id = p.id AND m.user_id = $2))
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a project owned by the given user
    pub async fn find_owned(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            "SELECT id, name, description, owner_id, created_at, updated_at \
             FROM projects WHERE id = $1 AND owner_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
    }

    /// Lists projects the user owns or belongs to, newest first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut qb = QueryBuilder::new(
            "SELECT DISTINCT p.id, p.name, p.description, p.owner_id, p.created_at, p.updated_at \
             FROM projects p \
             LEFT JOIN project_members m ON m.project_id = p.id \
             WHERE (p.owner_id = ",
        );
        qb.push_bind(user_id);
        qb.push(" OR m.user_id = ");
        qb.push_bind(user_id);
        qb.push(")");

        if let Some(search) = search {
            qb.push(" AND p.name ILIKE ");
            qb.push_bind(format!("%{}%", search));
        }

        qb.push(" ORDER BY p.created_at DESC");

        qb.build_query_as::<Project>().fetch_all(pool).await
    }

    /// Persists name and description
    pub async fn save(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects SET name = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, owner_id, created_at, updated_at
            "#,
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.description)
        .fetch_one(pool)
        .await
    }

    /// Deletes a project; columns and board tasks cascade away with it
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the users owning the most projects, busiest first
    pub async fn top_owners(pool: &PgPool, limit: i64) -> Result<Vec<OwnerCount>, sqlx::Error> {
        sqlx::query_as::<_, OwnerCount>(
            r#"
            SELECT u.id AS user_id, u.name, u.email, COUNT(p.id) AS project_count
            FROM projects p
            JOIN users u ON u.id = p.owner_id
            GROUP BY u.id, u.name, u.email
            ORDER BY COUNT(p.id) DESC, u.name ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Counts all projects
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

impl ProjectMember {
    /// Adds a member; fails on the (project_id, user_id) primary key if the
    /// user is already a member.
    pub async fn add(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, ProjectMember>(
            r#"
            INSERT INTO project_members (project_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING project_id, user_id, role, joined_at
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(role)
        .fetch_one(pool)
        .await
    }

    pub async fn find(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, ProjectMember>(
            "SELECT project_id, user_id, role, joined_at FROM project_members \
             WHERE project_id = $1 AND user_id = $2",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Lists a project's members, oldest joiner first
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ProjectMember>(
            "SELECT project_id, user_id, role, joined_at FROM project_members \
             WHERE project_id = $1 ORDER BY joined_at ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Changes a member's role
    pub async fn update_role(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, ProjectMember>(
            r#"
            UPDATE project_members SET role = $3
            WHERE project_id = $1 AND user_id = $2
            RETURNING project_id, user_id, role, joined_at
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(role)
        .fetch_optional(pool)
        .await
    }

    pub async fn remove(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
                .bind(project_id)
                .bind(user_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_role_as_str() {
        assert_eq!(MemberRole::Viewer.as_str(), "viewer");
        assert_eq!(MemberRole::Editor.as_str(), "editor");
    }

    #[test]
    fn test_member_role_serde() {
        let parsed: MemberRole = serde_json::from_str("\"editor\"").unwrap();
        assert_eq!(parsed, MemberRole::Editor);
        assert!(serde_json::from_str::<MemberRole>("\"owner\"").is_err());
    }
}
