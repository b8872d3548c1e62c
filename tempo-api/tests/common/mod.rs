/// Common test utilities for integration tests
///
/// Provides a [`TestContext`] that connects to the database named by
/// `DATABASE_URL`, runs migrations, creates an isolated test user, and
/// builds the router. When no database is reachable `TestContext::new`
/// returns `None` and callers skip, so the suite passes without
/// infrastructure.

use axum::body::Body;
use axum::http::{header, Request};
use sqlx::PgPool;
use uuid::Uuid;

use tempo_api::app::{build_router, AppState};
use tempo_api::config::{ApiConfig, AuthConfig, Config, DatabaseConfig};
use tempo_shared::auth::jwt::{create_token, SessionClaims};
use tempo_shared::email::Mailer;
use tempo_shared::models::user::{UpsertUser, User};

const TEST_JWT_SECRET: &str = "integration-test-secret-key-0123456789abcdef";

/// Test context containing the app, database, and a signed-in user
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub user: User,
    pub session: String,
    upload_dir: std::path::PathBuf,
}

impl TestContext {
    /// Builds a context, or `None` when no test database is available
    pub async fn new() -> Option<Self> {
        dotenvy::dotenv().ok();
        let url = std::env::var("DATABASE_URL").ok()?;

        let db = PgPool::connect(&url).await.ok()?;

        // Path relative to Cargo.toml, not this file
        sqlx::migrate!("../migrations")
            .run(&db)
            .await
            .expect("migrations should apply");

        let upload_dir =
            std::env::temp_dir().join(format!("tempo-test-uploads-{}", Uuid::new_v4()));

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url,
                max_connections: 5,
            },
            auth: AuthConfig {
                jwt_secret: TEST_JWT_SECRET.to_string(),
                google_client_id: "test-client-id".to_string(),
            },
            upload_dir: upload_dir.to_string_lossy().into_owned(),
            frontend_url: "http://localhost:5173".to_string(),
        };

        let user = create_user(&db, "user").await;
        let session = session_for(&user);

        let state = AppState::new(db.clone(), config, Mailer::disabled())
            .await
            .expect("state should build");
        let app = build_router(state);

        Some(TestContext {
            db,
            app,
            user,
            session,
            upload_dir,
        })
    }

    /// Cookie header value for the context's user
    pub fn cookie(&self) -> String {
        format!("token={}", self.session)
    }

    /// Builds a JSON request carrying the given session cookie
    pub fn request(
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    /// Promotes a user to admin directly in the database
    pub async fn make_admin(&self, user_id: Uuid) {
        sqlx::query("UPDATE users SET role = 'admin' WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .expect("role update should succeed");
    }

    /// Removes everything the test created (rows cascade from the users)
    pub async fn cleanup(&self, extra_users: &[Uuid]) {
        let mut ids = vec![self.user.id];
        ids.extend_from_slice(extra_users);

        sqlx::query("DELETE FROM users WHERE id = ANY($1)")
            .bind(&ids)
            .execute(&self.db)
            .await
            .expect("cleanup should succeed");

        let _ = tokio::fs::remove_dir_all(&self.upload_dir).await;
    }
}

/// Creates a user with a unique email and returns it
pub async fn create_user(db: &PgPool, prefix: &str) -> User {
    User::upsert_from_identity(
        db,
        UpsertUser {
            email: format!("{}-{}@example.com", prefix, Uuid::new_v4()),
            name: format!("Test {}", prefix),
            picture: None,
            google_id: Some(format!("google-{}", Uuid::new_v4())),
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Signs a session token for the given user
pub fn session_for(user: &User) -> String {
    create_token(&SessionClaims::new(user.id), TEST_JWT_SECRET)
        .expect("token creation should succeed")
}

/// Reads a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
