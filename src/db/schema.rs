//! SQL DDL for all habitrack tables.
//!
//! Defines the `habits`, `checkoffs`, `habit_log`, and `schema_meta` tables.
//! All DDL uses `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

const SCHEMA_SQL: &str = r#"
-- Habit definitions
CREATE TABLE IF NOT EXISTS habits (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    cadence TEXT NOT NULL CHECK(cadence IN ('daily','weekly')),
    created_at TEXT NOT NULL
);

-- Checkoff history, one row per accepted checkoff
CREATE TABLE IF NOT EXISTS checkoffs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    habit_id TEXT NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
    checked_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_checkoffs_habit ON checkoffs(habit_id);

-- Audit log
CREATE TABLE IF NOT EXISTS habit_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    operation TEXT NOT NULL CHECK(operation IN ('create','edit','checkoff','delete')),
    habit_id TEXT NOT NULL,
    details TEXT,
    created_at TEXT NOT NULL
);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Create any missing tables and seed `schema_version = 1`. Safe to re-run.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;
    Ok(())
}
