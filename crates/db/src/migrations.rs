/// Inline SQL migrations for the kemuri database schema.
///
/// We use simple inline migrations rather than sqlx migration files
/// because the schema is small and self-contained. The split mirrors how
/// the schema actually grew: per-event cigarette linking arrived after
/// the first release, so it lives in its own ALTER migration.
pub const MIGRATIONS: &[&str] = &[
    // Migration 1: cigarette settings history
    r#"
CREATE TABLE IF NOT EXISTS cigarettes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    brand TEXT NOT NULL,
    tar REAL NOT NULL DEFAULT 0,
    nicotine REAL NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);
"#,
    // Migration 2: smoking events
    r#"
CREATE TABLE IF NOT EXISTS smoking_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT NOT NULL
);
"#,
    r#"
CREATE INDEX IF NOT EXISTS idx_smoking_events_timestamp ON smoking_events(timestamp DESC);
"#,
    // Migration 3: link each event to the settings row current at log time
    r#"ALTER TABLE smoking_events ADD COLUMN cigarette_id INTEGER REFERENCES cigarettes(id);"#,
];
