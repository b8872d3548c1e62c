//! # Tempo API Server
//!
//! The HTTP server for Tempo: Google sign-in sessions, personal timeline
//! tasks, shared project boards, the label catalog, and the admin surface.
//! A background dispatcher sends due task-reminder emails.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p tempo-api
//! ```

use tempo_api::{app, config::Config, reminder::ReminderDispatcher};
use tempo_shared::{db, email::Mailer};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tempo_api=info,tempo_shared=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Tempo API v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    db::ensure_database_exists(&config.database.url).await?;
    let pool = db::create_pool(db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    db::run_migrations(&pool).await?;

    let mailer = Mailer::from_env()?;
    let state = app::AppState::new(pool.clone(), config.clone(), mailer).await?;

    let shutdown = CancellationToken::new();
    let dispatcher =
        ReminderDispatcher::new(pool.clone(), state.mailer.clone(), shutdown.clone());
    let dispatcher_handle = tokio::spawn(dispatcher.run());

    let router = app::build_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Server listening on http://{}", config.bind_address());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    dispatcher_handle.await?;
    db::close_pool(pool).await;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM and cancels the shared token
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    token.cancel();
}
