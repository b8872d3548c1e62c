/// Label catalog
///
/// Labels are a shared taxonomy of typed, colored tags attachable to both
/// personal and project tasks. The catalog is readable by everyone; only
/// admins mutate it, and labels seeded with `is_default = true` cannot be
/// deleted.
///
/// Tasks reference labels by id (`UUID[]` columns). Deleting a label leaves
/// those references dangling, so hydration always goes through
/// [`Label::find_by_ids`], which simply omits missing ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// The four label categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "label_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LabelType {
    TaskType,
    Status,
    Difficulty,
    Priority,
}

impl LabelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelType::TaskType => "task_type",
            LabelType::Status => "status",
            LabelType::Difficulty => "difficulty",
            LabelType::Priority => "priority",
        }
    }
}

/// A typed, colored tag
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: Uuid,

    pub name: String,

    /// Hex color, e.g. "#3B82F6"
    pub color: String,

    #[serde(rename = "type")]
    pub label_type: LabelType,

    /// Icon identifier, e.g. "mdi:label"
    pub icon: String,

    pub description: Option<String>,

    /// Seeded labels the API refuses to delete
    pub is_default: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a label
#[derive(Debug, Clone)]
pub struct CreateLabel {
    pub name: String,
    pub color: String,
    pub label_type: LabelType,
    pub icon: String,
    pub description: Option<String>,
    pub is_default: bool,
}

const LABEL_COLUMNS: &str =
    "id, name, color, label_type, icon, description, is_default, created_at, updated_at";

impl Label {
    pub async fn create(pool: &PgPool, data: CreateLabel) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Label>(&format!(
            r#"
            INSERT INTO labels (name, color, label_type, icon, description, is_default)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {LABEL_COLUMNS}
            "#
        ))
        .bind(data.name)
        .bind(data.color)
        .bind(data.label_type)
        .bind(data.icon)
        .bind(data.description)
        .bind(data.is_default)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Label>(&format!("SELECT {LABEL_COLUMNS} FROM labels WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetches labels for a set of ids, omitting unknown ids
    pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Self>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Label>(&format!(
            "SELECT {LABEL_COLUMNS} FROM labels WHERE id = ANY($1) ORDER BY label_type, name"
        ))
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// Lists the catalog, optionally restricted to one type
    pub async fn list(pool: &PgPool, label_type: Option<LabelType>) -> Result<Vec<Self>, sqlx::Error> {
        match label_type {
            Some(t) => {
                sqlx::query_as::<_, Label>(&format!(
                    "SELECT {LABEL_COLUMNS} FROM labels WHERE label_type = $1 ORDER BY label_type, name"
                ))
                .bind(t)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Label>(&format!(
                    "SELECT {LABEL_COLUMNS} FROM labels ORDER BY label_type, name"
                ))
                .fetch_all(pool)
                .await
            }
        }
    }

    /// Persists the mutable fields of this label
    pub async fn save(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Label>(&format!(
            r#"
            UPDATE labels SET
                name = $2,
                color = $3,
                label_type = $4,
                icon = $5,
                description = $6,
                is_default = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {LABEL_COLUMNS}
            "#
        ))
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.color)
        .bind(self.label_type)
        .bind(&self.icon)
        .bind(&self.description)
        .bind(self.is_default)
        .fetch_one(pool)
        .await
    }

    /// Deletes a label by id
    ///
    /// The default-label guard is the caller's responsibility; this is a
    /// plain delete.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM labels WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_type_as_str() {
        assert_eq!(LabelType::TaskType.as_str(), "task_type");
        assert_eq!(LabelType::Status.as_str(), "status");
        assert_eq!(LabelType::Difficulty.as_str(), "difficulty");
        assert_eq!(LabelType::Priority.as_str(), "priority");
    }

    #[test]
    fn test_label_type_serde_round_trip() {
        let json = serde_json::to_string(&LabelType::TaskType).unwrap();
        assert_eq!(json, "\"task_type\"");
        let parsed: LabelType = serde_json::from_str("\"priority\"").unwrap();
        assert_eq!(parsed, LabelType::Priority);
    }

    #[test]
    fn test_label_serializes_type_field() {
        let label = Label {
            id: Uuid::new_v4(),
            name: "High".to_string(),
            color: "#EF4444".to_string(),
            label_type: LabelType::Priority,
            icon: "mdi:chevron-up".to_string(),
            description: None,
            is_default: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&label).unwrap();
        assert_eq!(json["type"], "priority");
        assert_eq!(json["isDefault"], true);
    }
}
