// crates/server/src/main.rs
//! Kemuri server binary.
//!
//! Opens the SQLite store, builds the Axum app, and serves until ctrl-c,
//! closing the connection pool on the way out.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use kemuri_db::Database;
use kemuri_server::{create_app, AppState, Notifier};

/// Default port for the server.
const DEFAULT_PORT: u16 = 47311;

/// Get the server port from environment or use default.
fn get_port() -> u16 {
    std::env::var("KEMURI_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Get the static directory for serving frontend files.
///
/// Priority:
/// 1. KEMURI_STATIC_DIR environment variable (explicit override)
/// 2. ./dist directory (if it exists)
/// 3. None (API-only mode)
fn get_static_dir() -> Option<PathBuf> {
    std::env::var("KEMURI_STATIC_DIR")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            let dist = PathBuf::from("dist");
            dist.exists().then_some(dist)
        })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("kemuri=info,tower_http=warn")),
        )
        .compact()
        .init();

    // Open the database: explicit path wins, otherwise the platform data dir.
    let db = match std::env::var("KEMURI_DB") {
        Ok(path) => Database::new(PathBuf::from(path).as_path()).await?,
        Err(_) => Database::open_default().await?,
    };

    let notifier = std::env::var("KEMURI_WEBHOOK_URL").ok().map(Notifier::new);
    if notifier.is_some() {
        tracing::info!("Notification webhook configured");
    }

    let state = AppState::with_notifier(db.clone(), notifier);
    let app = create_app(state, get_static_dir());

    let port = get_port();
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("kemuri v{} listening on http://{}", env!("CARGO_PKG_VERSION"), addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Release the pool before exiting so WAL checkpoints cleanly.
    db.close().await;
    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install ctrl-c handler");
    }
}
