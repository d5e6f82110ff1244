// crates/server/src/lib.rs
//! Kemuri server library.
//!
//! This crate provides the Axum-based HTTP server for the kemuri smoking
//! tracker: a JSON API over the event/settings store plus optional static
//! serving of the prebuilt frontend.

pub mod error;
pub mod notify;
pub mod routes;
pub mod state;

pub use error::*;
pub use notify::Notifier;
pub use routes::api_routes;
pub use state::AppState;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Create the Axum application with all routes and middleware.
///
/// This sets up:
/// - API routes under /api
/// - Optional static file serving for the prebuilt frontend
/// - CORS for development (allows any origin)
/// - Request tracing
pub fn create_app(state: Arc<AppState>, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new().merge(api_routes(state));
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(cors).layer(TraceLayer::new_for_http())
}
