// crates/core/src/paths.rs
//! Centralized path functions for app storage locations.

use std::path::PathBuf;

/// App data root: `~/.local/share/kemuri/` on Linux, the platform data
/// dir elsewhere.
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("kemuri"))
}

/// SQLite database file: `<app_data_dir>/kemuri.db`.
pub fn db_path() -> Option<PathBuf> {
    app_data_dir().map(|d| d.join("kemuri.db"))
}
