//! Forward-only schema migrations.
//!
//! The applied version lives in `schema_meta`. Each entry of [`MIGRATIONS`]
//! moves the schema from `version - 1` to `version` inside its own transaction.

use rusqlite::{params, Connection};

/// A single forward step.
struct Migration {
    version: u32,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 2,
    description: "case-insensitive unique habit names",
    sql: "CREATE UNIQUE INDEX IF NOT EXISTS idx_habits_name_nocase \
          ON habits(name COLLATE NOCASE);",
}];

/// Schema version this build writes and expects.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    let raw: String = conn.query_row(
        "SELECT value FROM schema_meta WHERE key = 'schema_version'",
        [],
        |row| row.get(0),
    )?;
    Ok(raw.parse().unwrap_or(0))
}

/// Apply every migration newer than the stored version, oldest first.
pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    let from = get_schema_version(conn)?;
    tracing::debug!(schema_version = from, target = CURRENT_SCHEMA_VERSION, "checking migrations");

    for migration in MIGRATIONS.iter().filter(|m| m.version > from) {
        tracing::info!(
            to = migration.version,
            what = migration.description,
            "running migration"
        );

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(migration.sql)?;
        tx.execute(
            "UPDATE schema_meta SET value = ?1 WHERE key = 'schema_version'",
            params![migration.version.to_string()],
        )?;
        tx.commit()?;
    }

    Ok(())
}
