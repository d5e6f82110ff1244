//! API route handlers for the kemuri server.

pub mod cigarette;
pub mod health;
pub mod smoking;
pub mod stats;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - GET  /api/health - Health check
/// - GET  /api/cigarette - Latest cigarette settings (or empty defaults)
/// - POST /api/cigarette - Append a new settings row
/// - GET  /api/smoking - All events, newest first
/// - POST /api/smoking - Record one event or a bulk batch
/// - PUT  /api/smoking - Backfill unlinked events with the latest settings
/// - GET  /api/smoking/export - Export events as JSON or legacy CSV
/// - GET  /api/stats/chart - Chart payload for one of the five modes
/// - GET  /api/stats/health - Time since last cigarette + milestones
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", cigarette::router())
        .nest("/api", smoking::router())
        .nest("/api", stats::router())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_api_routes_creation() {
        let db = kemuri_db::Database::new_in_memory()
            .await
            .expect("in-memory DB");
        let state = AppState::new(db);
        let _router = api_routes(state);
    }
}
