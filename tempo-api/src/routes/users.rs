/// User profile endpoints
///
/// # Endpoints
///
/// - `GET /users/profile` - Current user's profile
/// - `PUT /users/profile` - Update name and/or picture
/// - `GET /users/login-history` - Paginated sign-in history, newest first

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use tempo_shared::models::login_history::LoginHistory;
use tempo_shared::models::user::User;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::session::CurrentUser,
};

/// Pagination envelope carried by list responses
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        Self {
            page,
            limit,
            total,
            pages: (total + limit - 1) / limit.max(1),
        }
    }
}

/// Standard page query parameters
#[derive(Debug, Deserialize)]
pub struct PageQuery {
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

impl PageQuery {
    /// Clamps to sane bounds and returns (limit, offset)
    pub fn bounds(&self) -> (i64, i64) {
        let page = self.page.max(1);
        let limit = self.limit.clamp(1, 100);
        (limit, (page - 1) * limit)
    }
}

/// Profile update request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 512, message = "Picture URL too long"))]
    pub picture: Option<String>,
}

pub async fn get_profile(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<serde_json::Value> {
    Json(json!({ "user": user }))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    body.validate()?;

    let updated = User::update_profile(
        &state.db,
        user.id,
        body.name.as_deref(),
        body.picture.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": updated,
    })))
}

pub async fn login_history(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let (limit, offset) = page.bounds();

    let entries = LoginHistory::list_for_user(&state.db, user.id, limit, offset).await?;
    let total = LoginHistory::count_for_user(&state.db, user.id).await?;

    Ok(Json(json!({
        "loginHistory": entries,
        "pagination": Pagination::new(page.page.max(1), limit, total),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_pages() {
        assert_eq!(Pagination::new(1, 10, 0).pages, 0);
        assert_eq!(Pagination::new(1, 10, 10).pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).pages, 2);
        assert_eq!(Pagination::new(1, 10, 95).pages, 10);
    }

    #[test]
    fn test_page_query_bounds() {
        let q = PageQuery { page: 0, limit: 500 };
        assert_eq!(q.bounds(), (100, 0));

        let q = PageQuery { page: 3, limit: 20 };
        assert_eq!(q.bounds(), (20, 40));
    }
}
