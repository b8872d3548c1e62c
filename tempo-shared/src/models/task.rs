/// Personal task model
///
/// A personal task is a time-boxed item owned by exactly one user. Its
/// `time_slot` is derived from the start time and used to group the daily
/// timeline. Subtasks are embedded (JSONB); labels and attachments are
/// reference arrays.
///
/// Updates follow a load-modify-save flow: handlers fetch the task (which
/// doubles as the ownership check), apply the changed fields, and call
/// [`Task::save`].
///
/// # Example
///
/// ```no_run
/// use chrono::Utc;
/// use tempo_shared::models::task::{CreateTask, Task, TimeSlot};
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let start = Utc::now();
/// let task = Task::create(
///     &pool,
///     CreateTask {
///         user_id,
///         title: "Standup".to_string(),
///         short_description: None,
///         detailed_description: None,
///         start_time: start,
///         end_time: start + chrono::Duration::minutes(15),
///         time_slot: TimeSlot::from_datetime(&start),
///         labels: vec![],
///         attachments: vec![],
///         subtasks: vec![],
///         email_reminder: None,
///     },
/// )
/// .await?;
/// println!("{} is in the {} slot", task.title, task.time_slot.as_str());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

/// Coarse timeline bucket derived from a task's start hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "time_slot", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Noon,
    Afternoon,
    Evening,
}

impl TimeSlot {
    /// Buckets an hour of day: [5,11) morning, [11,14) noon, [14,18)
    /// afternoon, everything else evening.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=10 => TimeSlot::Morning,
            11..=13 => TimeSlot::Noon,
            14..=17 => TimeSlot::Afternoon,
            _ => TimeSlot::Evening,
        }
    }

    /// Buckets the UTC hour of a timestamp
    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        Self::from_hour(dt.hour())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Noon => "noon",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
        }
    }
}

/// An embedded subtask (checklist item)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    /// Stable id so clients can address individual items
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    pub title: String,

    #[serde(default)]
    pub completed: bool,

    #[serde(default)]
    pub order: i32,
}

/// A personal time-boxed task
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,

    pub user_id: Uuid,

    pub title: String,

    pub short_description: Option<String>,

    pub detailed_description: Option<String>,

    pub start_time: DateTime<Utc>,

    pub end_time: DateTime<Utc>,

    /// Derived from `start_time` on create and whenever it changes
    pub time_slot: TimeSlot,

    /// Label references; hydrated to full label objects in responses
    #[serde(skip_serializing)]
    pub labels: Vec<Uuid>,

    /// Relative URLs under `/uploads/`
    pub attachments: Vec<String>,

    pub subtasks: Json<Vec<Subtask>>,

    /// When set, the reminder dispatcher emails the owner once at this time
    pub email_reminder: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a personal task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub user_id: Uuid,
    pub title: String,
    pub short_description: Option<String>,
    pub detailed_description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub time_slot: TimeSlot,
    pub labels: Vec<Uuid>,
    pub attachments: Vec<String>,
    pub subtasks: Vec<Subtask>,
    pub email_reminder: Option<DateTime<Utc>>,
}

/// Query filters for the timeline listing
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub time_slot: Option<TimeSlot>,

    /// Case-insensitive substring match on title or short description
    pub search: Option<String>,

    /// Inclusive lower bound on start_time
    pub start_date: Option<DateTime<Utc>>,

    /// Inclusive upper bound on start_time
    pub end_date: Option<DateTime<Utc>>,
}

/// A due reminder joined with its owner, for the dispatcher
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DueReminder {
    pub task_id: Uuid,
    pub title: String,
    pub short_description: Option<String>,
    pub email_reminder: DateTime<Utc>,
    pub user_email: String,
    pub user_name: String,
}

const TASK_COLUMNS: &str = "id, user_id, title, short_description, detailed_description, \
     start_time, end_time, time_slot, labels, attachments, subtasks, email_reminder, \
     created_at, updated_at";

impl Task {
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (user_id, title, short_description, detailed_description,
                               start_time, end_time, time_slot, labels, attachments,
                               subtasks, email_reminder)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.short_description)
        .bind(data.detailed_description)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.time_slot)
        .bind(data.labels)
        .bind(data.attachments)
        .bind(Json(data.subtasks))
        .bind(data.email_reminder)
        .fetch_one(pool)
        .await
    }

    /// Finds a task owned by the given user
    ///
    /// Scoping by owner in the query means a foreign task is
    /// indistinguishable from a missing one (404 either way).
    pub async fn find_for_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Lists a user's tasks sorted by start time ascending
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        filter: &TaskFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = "
        ));
        qb.push_bind(user_id);

        if let Some(slot) = filter.time_slot {
            qb.push(" AND time_slot = ");
            qb.push_bind(slot);
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            qb.push(" AND (title ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR short_description ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
        if let Some(start) = filter.start_date {
            qb.push(" AND start_time >= ");
            qb.push_bind(start);
        }
        if let Some(end) = filter.end_date {
            qb.push(" AND start_time <= ");
            qb.push_bind(end);
        }

        qb.push(" ORDER BY start_time ASC");

        qb.build_query_as::<Task>().fetch_all(pool).await
    }

    /// Persists all mutable fields of this task
    pub async fn save(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks SET
                title = $2,
                short_description = $3,
                detailed_description = $4,
                start_time = $5,
                end_time = $6,
                time_slot = $7,
                labels = $8,
                attachments = $9,
                subtasks = $10,
                email_reminder = $11,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(self.id)
        .bind(&self.title)
        .bind(&self.short_description)
        .bind(&self.detailed_description)
        .bind(self.start_time)
        .bind(self.end_time)
        .bind(self.time_slot)
        .bind(&self.labels)
        .bind(&self.attachments)
        .bind(&self.subtasks)
        .bind(self.email_reminder)
        .fetch_one(pool)
        .await
    }

    /// Deletes a task owned by the given user
    pub async fn delete_for_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts all personal tasks
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Fetches tasks whose reminder is due, joined with the owner
    pub async fn due_reminders(
        pool: &PgPool,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<DueReminder>, sqlx::Error> {
        sqlx::query_as::<_, DueReminder>(
            r#"
            SELECT t.id AS task_id, t.title, t.short_description, t.email_reminder,
                   u.email AS user_email, u.name AS user_name
            FROM tasks t
            JOIN users u ON u.id = t.user_id
            WHERE t.email_reminder IS NOT NULL AND t.email_reminder <= $1
            ORDER BY t.email_reminder ASC
            LIMIT $2
            "#,
        )
        .bind(now)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Counts personal tasks per status-label name
    ///
    /// A task carrying several status labels is counted under each.
    pub async fn count_by_status_label(
        pool: &PgPool,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT l.name, COUNT(*)
            FROM tasks t
            JOIN labels l ON l.id = ANY(t.labels)
            WHERE l.label_type = 'status'
            GROUP BY l.name
            ORDER BY COUNT(*) DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Clears a fired reminder so it sends once
    pub async fn clear_reminder(pool: &PgPool, task_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE tasks SET email_reminder = NULL WHERE id = $1")
            .bind(task_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_time_slot_boundaries() {
        assert_eq!(TimeSlot::from_hour(5), TimeSlot::Morning);
        assert_eq!(TimeSlot::from_hour(10), TimeSlot::Morning);
        assert_eq!(TimeSlot::from_hour(11), TimeSlot::Noon);
        assert_eq!(TimeSlot::from_hour(13), TimeSlot::Noon);
        assert_eq!(TimeSlot::from_hour(14), TimeSlot::Afternoon);
        assert_eq!(TimeSlot::from_hour(17), TimeSlot::Afternoon);
        assert_eq!(TimeSlot::from_hour(18), TimeSlot::Evening);
        assert_eq!(TimeSlot::from_hour(23), TimeSlot::Evening);
        assert_eq!(TimeSlot::from_hour(0), TimeSlot::Evening);
        assert_eq!(TimeSlot::from_hour(4), TimeSlot::Evening);
    }

    #[test]
    fn test_time_slot_from_datetime_uses_utc_hour() {
        let dt = Utc.with_ymd_and_hms(2025, 6, 10, 9, 30, 0).unwrap();
        assert_eq!(TimeSlot::from_datetime(&dt), TimeSlot::Morning);

        let dt = Utc.with_ymd_and_hms(2025, 6, 10, 21, 0, 0).unwrap();
        assert_eq!(TimeSlot::from_datetime(&dt), TimeSlot::Evening);
    }

    #[test]
    fn test_subtask_deserialize_defaults() {
        let subtask: Subtask = serde_json::from_str(r#"{"title": "write tests"}"#).unwrap();
        assert_eq!(subtask.title, "write tests");
        assert!(!subtask.completed);
        assert_eq!(subtask.order, 0);
    }

    #[test]
    fn test_subtask_round_trip_preserves_id() {
        let original = Subtask {
            id: Uuid::new_v4(),
            title: "a".to_string(),
            completed: true,
            order: 3,
        };
        let json = serde_json::to_string(&original).unwrap();
        let parsed: Subtask = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, original.id);
        assert!(parsed.completed);
        assert_eq!(parsed.order, 3);
    }
}
