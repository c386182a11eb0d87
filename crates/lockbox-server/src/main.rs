//! Lockbox server entry point.
//!
//! Bootstraps configuration, the shared database handle, and the transit
//! oracle client, then starts the Axum HTTP server with graceful shutdown.
//! The database handle is created exactly once here and cloned into the
//! stores — nothing replaces it afterwards.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::http::HeaderValue;
use tokio::net::TcpListener;
use tracing::info;

use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use lockbox_core::db::Database;
use lockbox_core::folders::FolderStore;
use lockbox_core::records::RecordStore;
use lockbox_core::transit::HttpTransitClient;

use lockbox_server::config::ServerConfig;
use lockbox_server::routes;
use lockbox_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load and validate configuration before anything else — a missing
    // oracle address or token fails here, not on the first request.
    let config = ServerConfig::from_env().context("invalid server configuration")?;

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(db = %config.database_path, oracle = %config.vault_addr, "lockbox starting");

    let db = Database::connect(&config.database_path)
        .await
        .context("failed to open database")?;

    let transit = Arc::new(HttpTransitClient::new(
        &config.vault_addr,
        &config.vault_token,
    ));

    let state = Arc::new(AppState {
        records: RecordStore::new(db.clone(), transit),
        folders: FolderStore::new(db),
    });

    let app = build_router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "lockbox server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("lockbox server stopped");
    Ok(())
}

/// Build the router with all routes and middleware.
fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    routes::app(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
