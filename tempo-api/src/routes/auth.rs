/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/google` - Sign in with a Google ID token
/// - `GET /auth/me` - Current user (session required)
/// - `POST /auth/logout` - Clear the session cookie
///
/// Sign-in verifies the ID token against Google's JWKS, upserts the local
/// user by email, refuses locked accounts, appends a login history row, and
/// sets the 7-day session cookie.

use axum::{
    extract::{Request, State},
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::Duration as CookieDuration;
use validator::Validate;

use tempo_shared::auth::jwt::{self, SessionClaims, SESSION_LIFETIME_DAYS};
use tempo_shared::models::login_history::LoginHistory;
use tempo_shared::models::user::{UpsertUser, User};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::session::{CurrentUser, SESSION_COOKIE},
};

/// Sign-in request
#[derive(Debug, Deserialize, Validate)]
pub struct GoogleSignInRequest {
    /// Google-issued ID token
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

/// Sign-in response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub message: String,
    pub user: User,
}

/// Signs in with a Google ID token
///
/// # Endpoint
///
/// ```text
/// POST /auth/google
/// Content-Type: application/json
///
/// { "token": "<google id token>" }
/// ```
pub async fn google_sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    req: Request,
) -> ApiResult<(CookieJar, Json<SignInResponse>)> {
    let (ip, user_agent) = client_metadata(&req);

    let body: GoogleSignInRequest = json_body(req).await?;
    body.validate()?;

    let profile = state.google.verify(&body.token).await?;

    let user = User::upsert_from_identity(
        &state.db,
        UpsertUser {
            email: profile.email,
            name: profile.name,
            picture: profile.picture,
            google_id: Some(profile.subject),
        },
    )
    .await?;

    if !user.is_active {
        return Err(ApiError::Forbidden("Account is locked".to_string()));
    }

    LoginHistory::record(&state.db, user.id, &ip, &user_agent).await?;

    let token = jwt::create_token(&SessionClaims::new(user.id), &state.config.auth.jwt_secret)?;
    let jar = jar.add(session_cookie(token, state.config.api.production));

    Ok((
        jar,
        Json(SignInResponse {
            message: "Signed in successfully".to_string(),
            user,
        }),
    ))
}

/// Returns the authenticated user
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<serde_json::Value> {
    Json(json!({ "user": user }))
}

/// Clears the session cookie
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<serde_json::Value>) {
    let mut expired = session_cookie(String::new(), state.config.api.production);
    expired.set_max_age(CookieDuration::ZERO);

    (
        jar.add(expired),
        Json(json!({ "message": "Signed out successfully" })),
    )
}

/// Builds the HTTP-only session cookie
fn session_cookie(token: String, production: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_max_age(CookieDuration::days(SESSION_LIFETIME_DAYS));

    if production {
        // Cross-site frontend in production needs None + Secure
        cookie.set_same_site(SameSite::None);
        cookie.set_secure(true);
    } else {
        cookie.set_same_site(SameSite::Lax);
    }

    cookie
}

/// Extracts client IP (x-forwarded-for aware) and user-agent
fn client_metadata(req: &Request) -> (String, String) {
    let headers = req.headers();

    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string())
        })
        .unwrap_or_else(|| "unknown".to_string());

    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    (ip, user_agent)
}

/// Deserializes the request body as JSON
///
/// Needed here because the handler also reads headers off the raw request;
/// elsewhere `Json<T>` extractors do this.
async fn json_body<T: serde::de::DeserializeOwned>(req: Request) -> Result<T, ApiError> {
    let bytes = axum::body::to_bytes(req.into_body(), 1024 * 1024)
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read body: {}", e)))?;

    serde_json::from_slice(&bytes).map_err(|e| ApiError::BadRequest(format!("Invalid JSON: {}", e)))
}
