/// User model and database operations
///
/// Users are created on first Google sign-in and never hard-deleted; an admin
/// can deactivate an account instead, which blocks sign-in and session use.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email CITEXT NOT NULL UNIQUE,
///     name VARCHAR(255) NOT NULL,
///     picture VARCHAR(512),
///     google_id VARCHAR(255) UNIQUE,
///     role user_role NOT NULL DEFAULT 'user',
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tempo_shared::models::user::{UpsertUser, User};
/// # use sqlx::PgPool;
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::upsert_from_identity(
///     &pool,
///     UpsertUser {
///         email: "user@example.com".to_string(),
///         name: "Jane Doe".to_string(),
///         picture: None,
///         google_id: Some("1085413...".to_string()),
///     },
/// )
/// .await?;
/// println!("Signed in: {}", user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

/// User roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular user
    User,

    /// Administrator: user management, label catalog, system configuration
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

/// A user account
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address (case-insensitive via CITEXT, unique)
    pub email: String,

    /// Display name
    pub name: String,

    /// Avatar URL from the identity provider
    pub picture: Option<String>,

    /// Google subject id, set on first Google sign-in
    #[serde(skip_serializing)]
    pub google_id: Option<String>,

    /// Role gating the admin surface
    pub role: UserRole,

    /// Deactivated accounts cannot sign in or use existing sessions
    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// A reduced user representation embedded in project and comment payloads
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
}

/// Input for the sign-in upsert
#[derive(Debug, Clone)]
pub struct UpsertUser {
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub google_id: Option<String>,
}

/// Filters for the admin user listing
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Case-insensitive substring match on name or email
    pub search: Option<String>,

    pub role: Option<UserRole>,

    pub is_active: Option<bool>,
}

const USER_COLUMNS: &str =
    "id, email, name, picture, google_id, role, is_active, created_at, updated_at";

impl User {
    /// Creates or refreshes a user from verified identity-provider claims
    ///
    /// A new account starts with role `user` and `is_active = true`. For an
    /// existing account the display name is overwritten and picture/google_id
    /// are filled in when the provider supplied them.
    pub async fn upsert_from_identity(pool: &PgPool, data: UpsertUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, picture, google_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE SET
                name = EXCLUDED.name,
                picture = COALESCE(EXCLUDED.picture, users.picture),
                google_id = COALESCE(EXCLUDED.google_id, users.google_id),
                updated_at = NOW()
            RETURNING id, email, name, picture, google_id, role, is_active, created_at, updated_at
            "#,
        )
        .bind(data.email)
        .bind(data.name)
        .bind(data.picture)
        .bind(data.google_id)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email (case-insensitive via CITEXT)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Updates the caller-editable profile fields
    ///
    /// Passing `None` leaves a field unchanged.
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        name: Option<&str>,
        picture: Option<&str>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                picture = COALESCE($3, picture),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(picture)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Sets the active flag (admin lock/unlock)
    pub async fn set_active(
        pool: &PgPool,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(is_active)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Returns the earliest-created admin account
    ///
    /// This account is treated as the root admin and cannot be deactivated.
    pub async fn find_root_admin(pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = 'admin' ORDER BY created_at ASC LIMIT 1"
        ))
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists users for the admin surface, newest first
    pub async fn list(
        pool: &PgPool,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut qb = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE TRUE"));
        push_user_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        qb.build_query_as::<User>().fetch_all(pool).await
    }

    /// Counts users matching the admin listing filter
    pub async fn count_filtered(pool: &PgPool, filter: &UserFilter) -> Result<i64, sqlx::Error> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM users WHERE TRUE");
        push_user_filter(&mut qb, filter);

        let (count,): (i64,) = qb.build_query_as().fetch_one(pool).await?;
        Ok(count)
    }

    /// Counts all users
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Counts active users
    pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE is_active")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Fetches reduced summaries for a set of user ids
    ///
    /// Used to hydrate project member lists and comment authors. Ids with no
    /// matching user are silently omitted.
    pub async fn summaries_by_ids(
        pool: &PgPool,
        ids: &[Uuid],
    ) -> Result<Vec<UserSummary>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, UserSummary>(
            "SELECT id, name, email, picture FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// Reduces this user to the embeddable summary shape
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            picture: self.picture.clone(),
        }
    }
}

fn push_user_filter(qb: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &UserFilter) {
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        qb.push(" AND (name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR email ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
    if let Some(role) = filter.role {
        qb.push(" AND role = ");
        qb.push_bind(role);
    }
    if let Some(is_active) = filter.is_active {
        qb.push(" AND is_active = ");
        qb.push_bind(is_active);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(UserRole::User.as_str(), "user");
        assert_eq!(UserRole::Admin.as_str(), "admin");
    }

    #[test]
    fn test_user_filter_default_is_empty() {
        let filter = UserFilter::default();
        assert!(filter.search.is_none());
        assert!(filter.role.is_none());
        assert!(filter.is_active.is_none());
    }

    #[test]
    fn test_google_id_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@example.com".to_string(),
            name: "A".to_string(),
            picture: None,
            google_id: Some("secret-subject".to_string()),
            role: UserRole::User,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("googleId").is_none());
        assert_eq!(json["email"], "a@example.com");
        assert_eq!(json["isActive"], true);
    }
}
