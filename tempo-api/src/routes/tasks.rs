/// Personal task endpoints
///
/// All operations are scoped to the authenticated owner; a task belonging to
/// someone else is indistinguishable from a missing one (404).
///
/// # Endpoints
///
/// - `GET /tasks` - Timeline listing with filters
/// - `POST /tasks` - Create (timeSlot derived from startTime)
/// - `GET /tasks/:id` / `PUT /tasks/:id` / `DELETE /tasks/:id`
/// - `PATCH /tasks/:id/time-slot` - Drag-and-drop retime
/// - `POST /tasks/:id/upload` - Multipart attachment upload
/// - `DELETE /tasks/:id/attachments/:filename` - Remove an attachment

use axum::{
    extract::{Multipart, Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use tempo_shared::models::label::Label;
use tempo_shared::models::task::{CreateTask, Subtask, Task, TaskFilter, TimeSlot};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::session::CurrentUser,
};

/// A task with its label references hydrated to full labels
#[derive(Debug, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub labels: Vec<Label>,
}

impl TaskView {
    /// Hydrates one task; dangling label refs are dropped
    pub async fn hydrate(state: &AppState, task: Task) -> Result<Self, sqlx::Error> {
        let labels = Label::find_by_ids(&state.db, &task.labels).await?;
        Ok(Self { task, labels })
    }
}

/// Listing query parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksQuery {
    pub time_slot: Option<TimeSlot>,
    pub search: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Create request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    pub short_description: Option<String>,
    pub detailed_description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    #[serde(default)]
    pub labels: Vec<Uuid>,

    #[serde(default)]
    pub subtasks: Vec<Subtask>,

    pub email_reminder: Option<DateTime<Utc>>,
}

/// Partial update request
///
/// A missing field leaves the stored value alone; an explicit `null` clears
/// nullable fields.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub short_description: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub detailed_description: Option<Option<String>>,

    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub labels: Option<Vec<Uuid>>,
    pub subtasks: Option<Vec<Subtask>>,

    #[serde(default, deserialize_with = "double_option")]
    pub email_reminder: Option<Option<DateTime<Utc>>>,
}

/// Retime request for the timeline drag-and-drop
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetimeRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub time_slot: Option<TimeSlot>,
}

/// Distinguishes an absent field from an explicit null
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let filter = TaskFilter {
        time_slot: query.time_slot,
        search: query.search,
        start_date: query.start_date,
        end_date: query.end_date,
    };

    let tasks = Task::list_for_user(&state.db, user.id, &filter).await?;

    let mut views = Vec::with_capacity(tasks.len());
    for task in tasks {
        views.push(TaskView::hydrate(&state, task).await?);
    }

    Ok(Json(json!({ "tasks": views })))
}

pub async fn get_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let task = find_owned(&state, id, user.id).await?;
    let view = TaskView::hydrate(&state, task).await?;

    Ok(Json(json!({ "task": view })))
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<CreateTaskRequest>,
) -> ApiResult<(axum::http::StatusCode, Json<serde_json::Value>)> {
    body.validate()?;

    if body.end_time < body.start_time {
        return Err(ApiError::BadRequest(
            "endTime must not be before startTime".to_string(),
        ));
    }

    let task = Task::create(
        &state.db,
        CreateTask {
            user_id: user.id,
            title: body.title,
            short_description: body.short_description,
            detailed_description: body.detailed_description,
            start_time: body.start_time,
            end_time: body.end_time,
            time_slot: TimeSlot::from_datetime(&body.start_time),
            labels: body.labels,
            attachments: Vec::new(),
            subtasks: body.subtasks,
            email_reminder: body.email_reminder,
        },
    )
    .await?;

    let view = TaskView::hydrate(&state, task).await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(json!({
            "message": "Task created successfully",
            "task": view,
        })),
    ))
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTaskRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    body.validate()?;

    let mut task = find_owned(&state, id, user.id).await?;

    if let Some(title) = body.title {
        task.title = title;
    }
    if let Some(v) = body.short_description {
        task.short_description = v;
    }
    if let Some(v) = body.detailed_description {
        task.detailed_description = v;
    }
    if let Some(start) = body.start_time {
        task.start_time = start;
        task.time_slot = TimeSlot::from_datetime(&start);
    }
    if let Some(end) = body.end_time {
        task.end_time = end;
    }
    if let Some(labels) = body.labels {
        task.labels = labels;
    }
    if let Some(subtasks) = body.subtasks {
        task.subtasks = sqlx::types::Json(subtasks);
    }
    if let Some(reminder) = body.email_reminder {
        task.email_reminder = reminder;
    }

    if task.end_time < task.start_time {
        return Err(ApiError::BadRequest(
            "endTime must not be before startTime".to_string(),
        ));
    }

    let saved = task.save(&state.db).await?;
    let view = TaskView::hydrate(&state, saved).await?;

    Ok(Json(json!({
        "message": "Task updated successfully",
        "task": view,
    })))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let task = find_owned(&state, id, user.id).await?;

    Task::delete_for_user(&state.db, id, user.id).await?;

    // Attachments are best-effort cleanup once the row is gone
    for url in &task.attachments {
        state.uploads.delete_by_url(url).await;
    }

    Ok(Json(json!({ "message": "Task deleted successfully" })))
}

/// Moves a task on the timeline (drag-and-drop)
pub async fn retime_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<RetimeRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if body.end_time < body.start_time {
        return Err(ApiError::BadRequest(
            "endTime must not be before startTime".to_string(),
        ));
    }

    let mut task = find_owned(&state, id, user.id).await?;

    task.start_time = body.start_time;
    task.end_time = body.end_time;
    task.time_slot = body
        .time_slot
        .unwrap_or_else(|| TimeSlot::from_datetime(&body.start_time));

    let saved = task.save(&state.db).await?;
    let view = TaskView::hydrate(&state, saved).await?;

    Ok(Json(json!({
        "message": "Task moved successfully",
        "task": view,
    })))
}

pub async fn upload_attachment(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Json<serde_json::Value>> {
    let mut task = find_owned(&state, id, user.id).await?;

    let url = store_upload(&state, multipart).await?;
    task.attachments.push(url.clone());

    let saved = task.save(&state.db).await?;
    let view = TaskView::hydrate(&state, saved).await?;

    Ok(Json(json!({
        "message": "File uploaded successfully",
        "url": url,
        "task": view,
    })))
}

pub async fn delete_attachment(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((id, filename)): Path<(Uuid, String)>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut task = find_owned(&state, id, user.id).await?;

    let suffix = format!("/{}", filename);
    let Some(pos) = task.attachments.iter().position(|u| u.ends_with(&suffix)) else {
        return Err(ApiError::NotFound("Attachment not found".to_string()));
    };

    let url = task.attachments.remove(pos);
    let saved = task.save(&state.db).await?;

    state.uploads.delete_by_url(&url).await;

    let view = TaskView::hydrate(&state, saved).await?;

    Ok(Json(json!({
        "message": "Attachment deleted successfully",
        "task": view,
    })))
}

/// Loads a task owned by the caller or 404s
async fn find_owned(state: &AppState, id: Uuid, user_id: Uuid) -> Result<Task, ApiError> {
    Task::find_for_user(&state.db, id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
}

/// Reads the first file field of a multipart body and stores it
pub(crate) async fn store_upload(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<String, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        let Some(file_name) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };

        let data = field.bytes().await?;
        if data.is_empty() {
            return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
        }

        return Ok(state.uploads.save(&file_name, &data).await?);
    }

    Err(ApiError::BadRequest("No file provided".to_string()))
}
