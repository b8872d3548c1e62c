/// Project board endpoints
///
/// Projects are Kanban boards shared between an owner and members. The
/// authorization rule on every structural mutation: allowed iff the caller
/// is the project owner or an editor member. Viewers read and comment.
///
/// Project-scoped lookups 404 when the caller has no standing at all (ids
/// must not leak); column/task routes resolve the resource first and answer
/// 403 when the caller lacks rights on its project.
///
/// # Endpoints
///
/// - `GET /projects` / `POST /projects` / `GET|PUT|DELETE /projects/:id`
/// - Members: `POST /projects/:id/members`, `POST /projects/:id/members/invite`,
///   `PUT /projects/:id/members/:userId/role`, `DELETE /projects/:id/members/:userId`
/// - Columns: `POST /projects/:projectId/columns`,
///   `PUT|DELETE /projects/columns/:columnId`
/// - Board tasks: `POST /projects/columns/:columnId/tasks`,
///   `PUT|DELETE /projects/tasks/:taskId`, `PATCH /projects/tasks/:taskId/move`,
///   upload/attachment routes, comment routes

use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use tempo_shared::auth::ProjectAccess;
use tempo_shared::models::column::Column;
use tempo_shared::models::label::Label;
use tempo_shared::models::project::{MemberRole, Project, ProjectMember};
use tempo_shared::models::project_task::{Comment, CreateProjectTask, ProjectTask};
use tempo_shared::models::task::Subtask;
use tempo_shared::models::user::{User, UserSummary};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::session::CurrentUser,
};

// ---------------------------------------------------------------------------
// View types

/// A membership with its user hydrated
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    pub user: UserSummary,
    pub role: MemberRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

/// A project with owner and members hydrated
#[derive(Debug, Serialize)]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub owner: Option<UserSummary>,
    pub members: Vec<MemberView>,
}

/// A comment with its author hydrated
#[derive(Debug, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub user: Option<UserSummary>,
}

/// A board task with labels and comment authors hydrated
#[derive(Debug, Serialize)]
pub struct ProjectTaskView {
    #[serde(flatten)]
    pub task: ProjectTask,
    pub labels: Vec<Label>,
    pub comments: Vec<CommentView>,
}

/// A column with its ordered tasks
#[derive(Debug, Serialize)]
pub struct ColumnView {
    #[serde(flatten)]
    pub column: Column,
    pub tasks: Vec<ProjectTaskView>,
}

// ---------------------------------------------------------------------------
// Request types

#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub user_id: Uuid,
    #[serde(default = "default_member_role")]
    pub role: MemberRole,
}

fn default_member_role() -> MemberRole {
    MemberRole::Editor
}

#[derive(Debug, Deserialize, Validate)]
pub struct InviteMemberRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default = "default_member_role")]
    pub role: MemberRole,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: MemberRole,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateColumnRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateColumnRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    pub position: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    pub short_description: Option<String>,
    pub detailed_description: Option<String>,
    #[serde(default)]
    pub labels: Vec<Uuid>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    pub email_reminder: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,
    pub short_description: Option<String>,
    pub detailed_description: Option<String>,
    pub labels: Option<Vec<Uuid>>,
    pub subtasks: Option<Vec<Subtask>>,

    /// An explicit `null` clears the reminder
    #[serde(default, deserialize_with = "super::tasks::double_option")]
    pub email_reminder: Option<Option<chrono::DateTime<chrono::Utc>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTaskRequest {
    pub column_id: Option<Uuid>,
    pub new_order: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAttachmentRequest {
    pub attachment_url: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub content: String,
}

// ---------------------------------------------------------------------------
// Projects

pub async fn list_projects(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<ListProjectsQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let projects = Project::list_for_user(&state.db, user.id, query.search.as_deref()).await?;

    let mut views = Vec::with_capacity(projects.len());
    for project in projects {
        views.push(hydrate_project(&state, project).await?);
    }

    Ok(Json(json!({ "projects": views })))
}

pub async fn get_project(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let project = Project::find_accessible(&state.db, id, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let columns = Column::list_for_project(&state.db, id).await?;
    let tasks = ProjectTask::list_for_project(&state.db, id).await?;

    // One pass of label and author hydration for the whole board
    let mut tasks_by_column: HashMap<Uuid, Vec<ProjectTaskView>> = HashMap::new();
    for task in tasks {
        let view = hydrate_project_task(&state, task).await?;
        tasks_by_column
            .entry(view.task.column_id)
            .or_default()
            .push(view);
    }

    let column_views: Vec<ColumnView> = columns
        .into_iter()
        .map(|column| ColumnView {
            tasks: tasks_by_column.remove(&column.id).unwrap_or_default(),
            column,
        })
        .collect();

    let project_view = hydrate_project(&state, project).await?;

    Ok(Json(json!({
        "project": project_view,
        "columns": column_views,
    })))
}

pub async fn create_project(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    body.validate()?;

    let project =
        Project::create(&state.db, user.id, &body.name, body.description.as_deref()).await?;
    let view = hydrate_project(&state, project).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Project created successfully",
            "project": view,
        })),
    ))
}

pub async fn update_project(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProjectRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    body.validate()?;

    let mut project = find_owned_project(&state, id, user.id).await?;

    if let Some(name) = body.name {
        project.name = name;
    }
    if let Some(description) = body.description {
        project.description = Some(description);
    }

    let saved = project.save(&state.db).await?;
    let view = hydrate_project(&state, saved).await?;

    Ok(Json(json!({
        "message": "Project updated successfully",
        "project": view,
    })))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    find_owned_project(&state, id, user.id).await?;

    // Board attachments are cleaned up before the cascade removes the rows
    let tasks = ProjectTask::list_for_project(&state.db, id).await?;
    for task in &tasks {
        for url in &task.attachments {
            state.uploads.delete_by_url(url).await;
        }
    }

    Project::delete(&state.db, id).await?;

    Ok(Json(json!({ "message": "Project deleted successfully" })))
}

// ---------------------------------------------------------------------------
// Members

pub async fn add_member(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let project = find_owned_project(&state, id, user.id).await?;

    if body.user_id == project.owner_id {
        return Err(ApiError::BadRequest(
            "The owner is already part of the project".to_string(),
        ));
    }

    User::find_by_id(&state.db, body.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if ProjectMember::find(&state.db, id, body.user_id).await?.is_some() {
        return Err(ApiError::BadRequest(
            "User is already a member of this project".to_string(),
        ));
    }

    ProjectMember::add(&state.db, id, body.user_id, body.role).await?;
    let view = hydrate_project(&state, project).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Member added successfully",
            "project": view,
        })),
    ))
}

/// Invites a user by email
///
/// Owner or editor may invite. A known email is added immediately; an
/// unknown email gets the invitation mail but no membership row until the
/// account exists. Either way the email failure is logged, never surfaced.
pub async fn invite_member(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<InviteMemberRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    body.validate()?;

    tempo_shared::auth::require_editor(&state.db, id, user.id).await?;

    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let Some(invitee) = User::find_by_email(&state.db, &body.email).await? else {
        // No account yet: invite by email anyway, persist nothing
        if let Err(e) = state
            .mailer
            .send_project_invitation(&body.email, &user.name, &project.name, &state.config.frontend_url)
            .await
        {
            tracing::warn!(project_id = %id, error = %e, "invitation email failed");
        }

        return Ok((
            StatusCode::OK,
            Json(json!({
                "message": "Invitation email sent successfully. User will be added when they register.",
                "invited": false,
            })),
        ));
    };

    if invitee.id == project.owner_id
        || ProjectMember::find(&state.db, id, invitee.id).await?.is_some()
    {
        return Err(ApiError::BadRequest(
            "User is already a member of this project".to_string(),
        ));
    }

    ProjectMember::add(&state.db, id, invitee.id, body.role).await?;

    // Best-effort notification; the membership stands either way
    if let Err(e) = state
        .mailer
        .send_project_invitation(&invitee.email, &user.name, &project.name, &state.config.frontend_url)
        .await
    {
        tracing::warn!(project_id = %id, error = %e, "invitation email failed");
    }

    let view = hydrate_project(&state, project).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Member added successfully",
            "invited": true,
            "project": view,
        })),
    ))
}

pub async fn update_member_role(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((id, member_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateRoleRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let project = find_owned_project(&state, id, user.id).await?;

    ProjectMember::update_role(&state.db, id, member_id, body.role)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    let view = hydrate_project(&state, project).await?;

    Ok(Json(json!({
        "message": "Member role updated successfully",
        "project": view,
    })))
}

pub async fn remove_member(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((id, member_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    let project = find_owned_project(&state, id, user.id).await?;

    if !ProjectMember::remove(&state.db, id, member_id).await? {
        return Err(ApiError::NotFound("Member not found".to_string()));
    }

    let view = hydrate_project(&state, project).await?;

    Ok(Json(json!({
        "message": "Member removed successfully",
        "project": view,
    })))
}

// ---------------------------------------------------------------------------
// Columns

pub async fn create_column(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(project_id): Path<Uuid>,
    Json(body): Json<CreateColumnRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    body.validate()?;

    tempo_shared::auth::require_editor(&state.db, project_id, user.id).await?;

    let column = Column::create(&state.db, project_id, &body.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Column created successfully",
            "column": column,
        })),
    ))
}

pub async fn update_column(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(column_id): Path<Uuid>,
    Json(body): Json<UpdateColumnRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    body.validate()?;

    let mut column = find_column(&state, column_id).await?;
    require_edit_on(&state, column.project_id, user.id).await?;

    if let Some(name) = body.name {
        column.name = name;
    }
    if let Some(position) = body.position {
        column.position = position;
    }

    let saved = column.save(&state.db).await?;

    Ok(Json(json!({
        "message": "Column updated successfully",
        "column": saved,
    })))
}

pub async fn delete_column(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(column_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let column = find_column(&state, column_id).await?;
    require_edit_on(&state, column.project_id, user.id).await?;

    // Clean up attachments before the cascade removes the task rows
    let tasks = ProjectTask::list_for_column(&state.db, column_id).await?;
    for task in &tasks {
        for url in &task.attachments {
            state.uploads.delete_by_url(url).await;
        }
    }

    Column::delete(&state.db, column_id).await?;

    Ok(Json(json!({ "message": "Column deleted successfully" })))
}

// ---------------------------------------------------------------------------
// Board tasks

pub async fn create_project_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(column_id): Path<Uuid>,
    Json(body): Json<CreateProjectTaskRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    body.validate()?;

    let column = find_column(&state, column_id).await?;
    require_edit_on(&state, column.project_id, user.id).await?;

    let task = ProjectTask::create(
        &state.db,
        column.project_id,
        column_id,
        CreateProjectTask {
            title: body.title,
            short_description: body.short_description,
            detailed_description: body.detailed_description,
            labels: body.labels,
            subtasks: body.subtasks,
            email_reminder: body.email_reminder,
        },
    )
    .await?;

    let view = hydrate_project_task(&state, task).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Task created successfully",
            "task": view,
        })),
    ))
}

pub async fn update_project_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
    Json(body): Json<UpdateProjectTaskRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    body.validate()?;

    let mut task = find_project_task(&state, task_id).await?;
    require_edit_on(&state, task.project_id, user.id).await?;

    if let Some(title) = body.title {
        task.title = title;
    }
    if let Some(v) = body.short_description {
        task.short_description = Some(v);
    }
    if let Some(v) = body.detailed_description {
        task.detailed_description = Some(v);
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

    let saved = task.save(&state.db).await?;
    let view = hydrate_project_task(&state, saved).await?;

    Ok(Json(json!({
        "message": "Task updated successfully",
        "task": view,
    })))
}

pub async fn delete_project_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let task = find_project_task(&state, task_id).await?;
    require_edit_on(&state, task.project_id, user.id).await?;

    ProjectTask::delete(&state.db, task_id).await?;

    for url in &task.attachments {
        state.uploads.delete_by_url(url).await;
    }

    Ok(Json(json!({ "message": "Task deleted successfully" })))
}

/// Moves a board task to another column and/or position
///
/// Position rewrites are last-write-wins; the client sends the whole
/// intended placement and the latest drag wins under concurrency.
pub async fn move_project_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
    Json(body): Json<MoveTaskRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut task = find_project_task(&state, task_id).await?;
    require_edit_on(&state, task.project_id, user.id).await?;

    if let Some(column_id) = body.column_id {
        let column = find_column(&state, column_id).await?;
        if column.project_id != task.project_id {
            return Err(ApiError::BadRequest(
                "Target column belongs to a different project".to_string(),
            ));
        }
        task.column_id = column_id;
    }

    if let Some(order) = body.new_order {
        task.position = order;
    }

    let saved = task.save(&state.db).await?;
    let view = hydrate_project_task(&state, saved).await?;

    Ok(Json(json!({
        "message": "Task moved successfully",
        "task": view,
    })))
}

pub async fn upload_task_attachment(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Json<serde_json::Value>> {
    let mut task = find_project_task(&state, task_id).await?;
    require_edit_on(&state, task.project_id, user.id).await?;

    let url = super::tasks::store_upload(&state, multipart).await?;
    task.attachments.push(url.clone());

    let saved = task.save(&state.db).await?;
    let view = hydrate_project_task(&state, saved).await?;

    Ok(Json(json!({
        "message": "File uploaded successfully",
        "url": url,
        "task": view,
    })))
}

pub async fn delete_task_attachment(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
    Json(body): Json<DeleteAttachmentRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut task = find_project_task(&state, task_id).await?;
    require_edit_on(&state, task.project_id, user.id).await?;

    let Some(pos) = task
        .attachments
        .iter()
        .position(|u| u == &body.attachment_url)
    else {
        return Err(ApiError::NotFound("Attachment not found".to_string()));
    };

    let url = task.attachments.remove(pos);
    let saved = task.save(&state.db).await?;

    state.uploads.delete_by_url(&url).await;

    let view = hydrate_project_task(&state, saved).await?;

    Ok(Json(json!({
        "message": "Attachment deleted successfully",
        "task": view,
    })))
}

// ---------------------------------------------------------------------------
// Comments

/// Adds a comment; any member may comment, viewers included
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
    Json(body): Json<AddCommentRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    body.validate()?;

    let mut task = find_project_task(&state, task_id).await?;

    let access = ProjectAccess::resolve(&state.db, task.project_id, user.id).await?;
    if access.is_none() {
        return Err(ApiError::Forbidden(
            "You do not have access to this project".to_string(),
        ));
    }

    task.comments.0.push(Comment::new(user.id, body.content));
    let saved = task.save(&state.db).await?;
    let view = hydrate_project_task(&state, saved).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Comment added successfully",
            "task": view,
        })),
    ))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((task_id, comment_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut task = find_project_task(&state, task_id).await?;
    require_edit_on(&state, task.project_id, user.id).await?;

    let before = task.comments.0.len();
    task.comments.0.retain(|c| c.id != comment_id);
    if task.comments.0.len() == before {
        return Err(ApiError::NotFound("Comment not found".to_string()));
    }

    let saved = task.save(&state.db).await?;
    let view = hydrate_project_task(&state, saved).await?;

    Ok(Json(json!({
        "message": "Comment deleted successfully",
        "task": view,
    })))
}

// ---------------------------------------------------------------------------
// Helpers

/// Loads a project the caller owns; 404 whether missing or not theirs
async fn find_owned_project(
    state: &AppState,
    id: Uuid,
    user_id: Uuid,
) -> Result<Project, ApiError> {
    Project::find_owned(&state.db, id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))
}

async fn find_column(state: &AppState, id: Uuid) -> Result<Column, ApiError> {
    Column::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Column not found".to_string()))
}

async fn find_project_task(state: &AppState, id: Uuid) -> Result<ProjectTask, ApiError> {
    ProjectTask::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
}

/// Resource-first permission check: the resource exists, so a caller
/// without edit rights gets 403 (non-members included)
async fn require_edit_on(state: &AppState, project_id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
    match ProjectAccess::resolve(&state.db, project_id, user_id).await? {
        Some(access) if access.can_edit() => Ok(()),
        _ => Err(ApiError::Forbidden(
            "You do not have permission to modify this project".to_string(),
        )),
    }
}

/// Hydrates owner and member summaries onto a project
async fn hydrate_project(state: &AppState, project: Project) -> Result<ProjectView, ApiError> {
    let members = ProjectMember::list_for_project(&state.db, project.id).await?;

    let mut ids: Vec<Uuid> = members.iter().map(|m| m.user_id).collect();
    ids.push(project.owner_id);

    let summaries = User::summaries_by_ids(&state.db, &ids).await?;
    let by_id: HashMap<Uuid, UserSummary> =
        summaries.into_iter().map(|s| (s.id, s)).collect();

    let member_views = members
        .into_iter()
        .filter_map(|m| {
            by_id.get(&m.user_id).map(|user| MemberView {
                user: user.clone(),
                role: m.role,
                joined_at: m.joined_at,
            })
        })
        .collect();

    Ok(ProjectView {
        owner: by_id.get(&project.owner_id).cloned(),
        project,
        members: member_views,
    })
}

/// Hydrates labels and comment authors onto a board task
async fn hydrate_project_task(
    state: &AppState,
    task: ProjectTask,
) -> Result<ProjectTaskView, ApiError> {
    let labels = Label::find_by_ids(&state.db, &task.labels).await?;

    let author_ids: Vec<Uuid> = task.comments.0.iter().map(|c| c.user_id).collect();
    let summaries = User::summaries_by_ids(&state.db, &author_ids).await?;
    let by_id: HashMap<Uuid, UserSummary> =
        summaries.into_iter().map(|s| (s.id, s)).collect();

    let comments = task
        .comments
        .0
        .iter()
        .map(|c| CommentView {
            user: by_id.get(&c.user_id).cloned(),
            comment: c.clone(),
        })
        .collect();

    Ok(ProjectTaskView {
        task,
        labels,
        comments,
    })
}
