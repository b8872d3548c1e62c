/// Cookie session authentication
///
/// The session JWT travels in an HTTP-only cookie named `token`, set at
/// sign-in. This middleware reads the cookie, validates the token, loads the
/// user, and rejects inactive accounts. The resolved [`CurrentUser`] lands in
/// request extensions for handlers to extract.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use tempo_shared::auth::jwt;
use tempo_shared::models::user::{User, UserRole};

use crate::{app::AppState, error::ApiError};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "token";

/// The authenticated caller, attached to request extensions
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Requires a valid session; attaches [`CurrentUser`]
pub async fn session_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let jar = CookieJar::from_headers(req.headers());
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    let claims = jwt::validate_token(&token, &state.config.auth.jwt_secret)?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

    if !user.is_active {
        return Err(ApiError::Unauthorized("Account is locked".to_string()));
    }

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

/// Requires the attached user to be an admin
///
/// Must be layered inside [`session_auth`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    if user.0.role != UserRole::Admin {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(req).await)
}
