// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use kemuri_db::Database;

use crate::notify::Notifier;

/// Shared application state accessible from all route handlers.
///
/// No mutable business state lives here: the database handle owns the
/// connection pool and the notifier is a stateless HTTP client.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Database handle for event/settings queries.
    pub db: Database,
    /// Push-notification client; `None` when no webhook is configured.
    pub notifier: Option<Notifier>,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    pub fn new(db: Database) -> Arc<Self> {
        Self::with_notifier(db, None)
    }

    /// Create with an optional notifier (configured from the environment
    /// in `main`, injected directly in tests).
    pub fn with_notifier(db: Database, notifier: Option<Notifier>) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            db,
            notifier,
        })
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
