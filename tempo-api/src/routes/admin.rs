/// Administrative endpoints
///
/// All routes require an authenticated admin.
///
/// # Endpoints
///
/// - `GET /admin/users` - Paginated listing with search/role/isActive filters
/// - `PATCH /admin/users/:userId/status` - Lock or unlock an account
/// - `GET /admin/users/:userId/login-history` - Any user's sign-in log
/// - `GET /admin/statistics` - Aggregate counts
/// - `GET /admin/config` / `PUT /admin/config` - Settings singleton

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use tempo_shared::models::login_history::LoginHistory;
use tempo_shared::models::project::Project;
use tempo_shared::models::system_config::{SystemConfig, UpdateSystemConfig};
use tempo_shared::models::task::Task;
use tempo_shared::models::user::{User, UserFilter, UserRole};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::session::CurrentUser,
    routes::users::{PageQuery, Pagination},
};

/// User listing query parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,

    // serde_urlencoded can't flatten a nested struct, so the page
    // fields repeat here
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleStatusRequest {
    pub is_active: bool,
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let filter = UserFilter {
        search: query.search,
        role: query.role,
        is_active: query.is_active,
    };

    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let (limit, offset) = page.bounds();

    let users = User::list(&state.db, &filter, limit, offset).await?;
    let total = User::count_filtered(&state.db, &filter).await?;

    Ok(Json(json!({
        "users": users,
        "pagination": Pagination::new(query.page.max(1), limit, total),
    })))
}

/// Locks or unlocks an account
///
/// The earliest-created admin is the root admin and cannot be locked.
pub async fn toggle_user_status(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<ToggleStatusRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let target = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if !body.is_active {
        if let Some(root) = User::find_root_admin(&state.db).await? {
            if root.id == target.id {
                return Err(ApiError::BadRequest("Cannot lock root admin".to_string()));
            }
        }
    }

    let updated = User::set_active(&state.db, user_id, body.is_active)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let message = if body.is_active {
        "User unlocked successfully"
    } else {
        "User locked successfully"
    };

    Ok(Json(json!({
        "message": message,
        "user": updated,
    })))
}

pub async fn user_login_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let (limit, offset) = page.bounds();
    let entries = LoginHistory::list_for_user(&state.db, user_id, limit, offset).await?;
    let total = LoginHistory::count_for_user(&state.db, user_id).await?;

    Ok(Json(json!({
        "loginHistory": entries,
        "pagination": Pagination::new(page.page.max(1), limit, total),
    })))
}

pub async fn statistics(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let total_users = User::count(&state.db).await?;
    let active_users = User::count_active(&state.db).await?;

    let total_tasks = Task::count(&state.db).await?;
    let total_projects = Project::count(&state.db).await?;

    let tasks_by_status: serde_json::Map<String, serde_json::Value> =
        Task::count_by_status_label(&state.db)
            .await?
            .into_iter()
            .map(|(name, count)| (name, json!(count)))
            .collect();

    let top_owners = Project::top_owners(&state.db, 10).await?;

    Ok(Json(json!({
        "users": {
            "total": total_users,
            "active": active_users,
            "inactive": total_users - active_users,
        },
        "tasks": {
            "total": total_tasks,
            "byStatus": tasks_by_status,
        },
        "projects": {
            "total": total_projects,
            "topOwners": top_owners,
        },
    })))
}

pub async fn get_config(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let config = SystemConfig::get_or_create(&state.db).await?;
    Ok(Json(json!({ "config": config })))
}

pub async fn update_config(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<UpdateSystemConfig>,
) -> ApiResult<Json<serde_json::Value>> {
    let config = SystemConfig::update(&state.db, body, user.id).await?;

    Ok(Json(json!({
        "message": "Configuration updated successfully",
        "config": config,
    })))
}
