/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware.
///
/// # Example
///
/// ```no_run
/// use tempo_api::{app::AppState, config::Config};
/// use tempo_shared::email::Mailer;
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config, Mailer::disabled()).await?;
/// let app = tempo_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer, uploads::UploadStore};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tempo_shared::auth::GoogleTokenVerifier;
use tempo_shared::email::Mailer;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request via Axum's `State` extractor; everything heavy sits
/// behind an Arc.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Google ID-token verifier
    pub google: Arc<GoogleTokenVerifier>,

    /// Outbound mailer
    pub mailer: Arc<Mailer>,

    /// Attachment storage
    pub uploads: Arc<UploadStore>,
}

impl AppState {
    /// Creates application state, opening the upload directory
    pub async fn new(db: PgPool, config: Config, mailer: Mailer) -> anyhow::Result<Self> {
        let uploads = UploadStore::new(&config.upload_dir).await?;
        let google = GoogleTokenVerifier::new(config.auth.google_client_id.clone());

        Ok(Self {
            db,
            config: Arc::new(config),
            google: Arc::new(google),
            mailer: Arc::new(mailer),
            uploads: Arc::new(uploads),
        })
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                     # Liveness probe (public)
/// ├── /uploads/*                  # Stored attachments (static)
/// ├── /auth                       # Google sign-in, me, logout
/// ├── /users                      # Profile and login history (session)
/// ├── /tasks                      # Personal timeline tasks (session)
/// ├── /labels                     # Catalog reads public, writes admin
/// ├── /projects                   # Boards, columns, tasks (session)
/// └── /admin                      # User management, stats (session+admin)
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::middleware::session::{require_admin, session_auth};
    use crate::routes;

    let session = axum::middleware::from_fn_with_state(state.clone(), session_auth);
    let admin_gate = axum::middleware::from_fn(require_admin);

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/google", post(routes::auth::google_sign_in))
        .route("/logout", post(routes::auth::logout))
        .route("/me", get(routes::auth::me).layer(session.clone()));

    let user_routes = Router::new()
        .route(
            "/profile",
            get(routes::users::get_profile).put(routes::users::update_profile),
        )
        .route("/login-history", get(routes::users::login_history))
        .layer(session.clone());

    let task_routes = Router::new()
        .route("/", get(routes::tasks::list_tasks).post(routes::tasks::create_task))
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/:id/time-slot", patch(routes::tasks::retime_task))
        .route("/:id/upload", post(routes::tasks::upload_attachment))
        .route(
            "/:id/attachments/:filename",
            delete(routes::tasks::delete_attachment),
        )
        .layer(session.clone());

    let label_read_routes = Router::new()
        .route("/", get(routes::labels::list_labels))
        .route("/:id", get(routes::labels::get_label));

    let label_admin_routes = Router::new()
        .route("/", post(routes::labels::create_label))
        .route(
            "/:id",
            put(routes::labels::update_label).delete(routes::labels::delete_label),
        )
        .layer(admin_gate.clone())
        .layer(session.clone());

    let project_routes = Router::new()
        .route(
            "/",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/:id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route("/:id/members", post(routes::projects::add_member))
        .route("/:id/members/invite", post(routes::projects::invite_member))
        .route(
            "/:id/members/:user_id/role",
            put(routes::projects::update_member_role),
        )
        .route("/:id/members/:user_id", delete(routes::projects::remove_member))
        .route("/:project_id/columns", post(routes::projects::create_column))
        .route(
            "/columns/:column_id",
            put(routes::projects::update_column).delete(routes::projects::delete_column),
        )
        .route(
            "/columns/:column_id/tasks",
            post(routes::projects::create_project_task),
        )
        .route(
            "/tasks/:task_id",
            put(routes::projects::update_project_task)
                .delete(routes::projects::delete_project_task),
        )
        .route("/tasks/:task_id/move", patch(routes::projects::move_project_task))
        .route("/tasks/:task_id/upload", post(routes::projects::upload_task_attachment))
        .route(
            "/tasks/:task_id/attachments",
            delete(routes::projects::delete_task_attachment),
        )
        .route("/tasks/:task_id/comments", post(routes::projects::add_comment))
        .route(
            "/tasks/:task_id/comments/:comment_id",
            delete(routes::projects::delete_comment),
        )
        .layer(session.clone());

    let admin_routes = Router::new()
        .route("/users", get(routes::admin::list_users))
        .route("/users/:user_id/status", patch(routes::admin::toggle_user_status))
        .route(
            "/users/:user_id/login-history",
            get(routes::admin::user_login_history),
        )
        .route("/statistics", get(routes::admin::statistics))
        .route(
            "/config",
            get(routes::admin::get_config).put(routes::admin::update_config),
        )
        .layer(admin_gate)
        .layer(session);

    let cors = build_cors(&state.config);

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/tasks", task_routes)
        .nest("/labels", label_read_routes.merge(label_admin_routes))
        .nest("/projects", project_routes)
        .nest("/admin", admin_routes)
        .nest_service("/uploads", ServeDir::new(state.uploads.dir()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// CORS policy: permissive in development, origin list in production
fn build_cors(config: &Config) -> CorsLayer {
    if config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::COOKIE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    }
}
