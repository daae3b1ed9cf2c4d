//! SQLite persistence for habits and checkoffs.
//!
//! Every mutation runs inside a transaction and writes a `habit_log` audit
//! row. Validation lives on [`Habit`]; this module adds the sibling-aware
//! duplicate-name check and makes deletion atomic with the habit's history.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::collections::HashMap;

use super::timestamp::{format_timestamp, parse_timestamp};
use super::types::{names_match, Cadence, Habit, ValidationError};
use super::HabitSource;

/// Outcome of [`record_checkoff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoffOutcome {
    /// The checkoff was stored.
    Accepted,
    /// Redundant with the habit's most recent checkoff; nothing was stored.
    Rejected,
    /// No habit has the given identifier.
    UnknownHabit,
}

/// An audit log row for one habit.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub operation: String,
    pub details: Option<serde_json::Value>,
    pub created_at: String,
}

/// [`HabitSource`] over a borrowed database connection.
pub struct SqliteHabitStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteHabitStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl HabitSource for SqliteHabitStore<'_> {
    fn fetch_all_habits(&self) -> Result<Vec<Habit>> {
        load_habits(self.conn)
    }

    fn fetch_checkoffs(&self, habit_id: &str) -> Result<Vec<NaiveDateTime>> {
        load_checkoffs(self.conn, habit_id)
    }

    fn resolve_identifier(&self, name: &str) -> Result<Option<String>> {
        find_habit_id(self.conn, name)
    }

    fn fetch_habit(&self, habit_id: &str) -> Result<Option<Habit>> {
        load_habit(self.conn, habit_id)
    }
}

/// Raw `habits` row before cadence and timestamp parsing.
struct HabitRow {
    id: String,
    name: String,
    description: String,
    cadence: String,
    created_at: String,
}

impl HabitRow {
    fn into_habit(self, checkoffs: Vec<NaiveDateTime>) -> Result<Habit> {
        let cadence: Cadence = self
            .cadence
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("habit {} has invalid cadence", self.id))?;
        let created_at = parse_timestamp(&self.created_at)
            .with_context(|| format!("habit {} has invalid created_at", self.id))?;
        Ok(Habit::restore(
            self.id,
            self.name,
            self.description,
            cadence,
            created_at,
            checkoffs,
        ))
    }
}

const HABIT_SELECT_SQL: &str =
    "SELECT id, name, description, cadence, created_at FROM habits";

fn map_habit_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<HabitRow> {
    Ok(HabitRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        cadence: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Load every habit with its history, in insertion order.
pub fn load_habits(conn: &Connection) -> Result<Vec<Habit>> {
    let mut stmt = conn.prepare(&format!("{HABIT_SELECT_SQL} ORDER BY rowid"))?;
    let rows: Vec<HabitRow> = stmt
        .query_map([], map_habit_row)?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare("SELECT habit_id, checked_at FROM checkoffs ORDER BY id")?;
    let checkoff_rows: Vec<(String, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut by_habit: HashMap<String, Vec<NaiveDateTime>> = HashMap::new();
    for (habit_id, checked_at) in checkoff_rows {
        let ts = parse_timestamp(&checked_at)
            .with_context(|| format!("habit {habit_id} has an invalid checkoff"))?;
        by_habit.entry(habit_id).or_default().push(ts);
    }

    rows.into_iter()
        .map(|row| {
            let checkoffs = by_habit.remove(&row.id).unwrap_or_default();
            row.into_habit(checkoffs)
        })
        .collect()
}

/// Load one habit with its history.
pub fn load_habit(conn: &Connection, habit_id: &str) -> Result<Option<Habit>> {
    let row = conn
        .query_row(
            &format!("{HABIT_SELECT_SQL} WHERE id = ?1"),
            params![habit_id],
            map_habit_row,
        )
        .optional()?;

    match row {
        Some(row) => {
            let checkoffs = load_checkoffs(conn, habit_id)?;
            Ok(Some(row.into_habit(checkoffs)?))
        }
        None => Ok(None),
    }
}

/// Checkoff timestamps of one habit in append order.
pub fn load_checkoffs(conn: &Connection, habit_id: &str) -> Result<Vec<NaiveDateTime>> {
    let mut stmt =
        conn.prepare("SELECT checked_at FROM checkoffs WHERE habit_id = ?1 ORDER BY id")?;
    let raw: Vec<String> = stmt
        .query_map(params![habit_id], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;

    raw.iter()
        .map(|s| parse_timestamp(s).map_err(anyhow::Error::from))
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("habit {habit_id} has an invalid checkoff"))
}

/// Resolve a habit name (case-insensitive) to its identifier.
pub fn find_habit_id(conn: &Connection, name: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT id, name FROM habits ORDER BY rowid")?;
    let rows: Vec<(String, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows
        .into_iter()
        .find(|(_, stored)| names_match(stored, name))
        .map(|(id, _)| id))
}

/// Resolve a name and load the matching habit.
pub fn find_habit_by_name(conn: &Connection, name: &str) -> Result<Option<Habit>> {
    match find_habit_id(conn, name)? {
        Some(id) => load_habit(conn, &id),
        None => Ok(None),
    }
}

/// Create and persist a habit. Fails with [`ValidationError`] on an empty or
/// duplicate (case-insensitive) name.
pub fn create_habit(
    conn: &mut Connection,
    name: &str,
    description: &str,
    cadence: Cadence,
) -> Result<Habit> {
    let habit = Habit::create(name, description, cadence)?;

    let tx = conn.transaction()?;

    if find_habit_id(&tx, habit.name())?.is_some() {
        return Err(ValidationError::DuplicateName(habit.name().to_string()).into());
    }

    tx.execute(
        "INSERT INTO habits (id, name, description, cadence, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            habit.id(),
            habit.name(),
            habit.description(),
            habit.cadence().as_str(),
            format_timestamp(&habit.created_at()),
        ],
    )?;

    write_audit_log(
        &tx,
        "create",
        habit.id(),
        Some(&serde_json::json!({"name": habit.name(), "cadence": habit.cadence()})),
    )?;

    tx.commit()?;

    tracing::info!(id = %habit.id(), name = %habit.name(), cadence = %habit.cadence(), "habit created");
    Ok(habit)
}

/// Rename and re-describe a habit. Returns `None` for an unknown identifier.
pub fn update_habit(
    conn: &mut Connection,
    habit_id: &str,
    new_name: &str,
    new_description: &str,
) -> Result<Option<Habit>> {
    let tx = conn.transaction()?;

    let Some(mut habit) = load_habit(&tx, habit_id)? else {
        return Ok(None);
    };
    let old_name = habit.name().to_string();
    habit.edit(new_name, new_description)?;

    if let Some(other) = find_habit_id(&tx, habit.name())? {
        if other != habit_id {
            return Err(ValidationError::DuplicateName(habit.name().to_string()).into());
        }
    }

    tx.execute(
        "UPDATE habits SET name = ?1, description = ?2 WHERE id = ?3",
        params![habit.name(), habit.description(), habit_id],
    )?;

    write_audit_log(
        &tx,
        "edit",
        habit_id,
        Some(&serde_json::json!({"old_name": old_name, "new_name": habit.name()})),
    )?;

    tx.commit()?;

    tracing::info!(id = %habit_id, name = %habit.name(), "habit edited");
    Ok(Some(habit))
}

/// Apply the checkoff-validity rule and persist an accepted checkoff.
pub fn record_checkoff(
    conn: &mut Connection,
    habit_id: &str,
    at: NaiveDateTime,
) -> Result<CheckoffOutcome> {
    let tx = conn.transaction()?;

    let Some(mut habit) = load_habit(&tx, habit_id)? else {
        return Ok(CheckoffOutcome::UnknownHabit);
    };

    if !habit.checkoff(at) {
        tracing::debug!(id = %habit_id, at = %at, cadence = %habit.cadence(), "checkoff rejected as redundant");
        return Ok(CheckoffOutcome::Rejected);
    }

    let checked_at = format_timestamp(&at);
    tx.execute(
        "INSERT INTO checkoffs (habit_id, checked_at) VALUES (?1, ?2)",
        params![habit_id, checked_at],
    )?;

    write_audit_log(
        &tx,
        "checkoff",
        habit_id,
        Some(&serde_json::json!({"checked_at": checked_at})),
    )?;

    tx.commit()?;

    tracing::info!(id = %habit_id, at = %checked_at, streak = habit.streak(), "checkoff recorded");
    Ok(CheckoffOutcome::Accepted)
}

/// Delete a habit together with its checkoff history. Returns `false` for an
/// unknown identifier.
pub fn delete_habit(conn: &mut Connection, habit_id: &str) -> Result<bool> {
    let tx = conn.transaction()?;

    let name: Option<String> = tx
        .query_row(
            "SELECT name FROM habits WHERE id = ?1",
            params![habit_id],
            |row| row.get(0),
        )
        .optional()?;
    let Some(name) = name else {
        return Ok(false);
    };

    let removed = tx.execute("DELETE FROM checkoffs WHERE habit_id = ?1", params![habit_id])?;
    tx.execute("DELETE FROM habits WHERE id = ?1", params![habit_id])?;

    write_audit_log(
        &tx,
        "delete",
        habit_id,
        Some(&serde_json::json!({"name": name, "checkoffs_removed": removed})),
    )?;

    tx.commit()?;

    tracing::info!(id = %habit_id, name = %name, checkoffs = removed, "habit deleted");
    Ok(true)
}

/// Write an entry to the `habit_log` audit table.
pub fn write_audit_log(
    conn: &Connection,
    operation: &str,
    habit_id: &str,
    details: Option<&serde_json::Value>,
) -> Result<()> {
    let now = format_timestamp(&super::timestamp::now());
    let details_json = details.map(serde_json::to_string).transpose()?;

    conn.execute(
        "INSERT INTO habit_log (operation, habit_id, details, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![operation, habit_id, details_json, now],
    )?;
    Ok(())
}

/// Audit log entries for one habit, oldest first.
pub fn read_audit_log(conn: &Connection, habit_id: &str) -> Result<Vec<LogEntry>> {
    let mut stmt = conn.prepare(
        "SELECT operation, details, created_at FROM habit_log WHERE habit_id = ?1 ORDER BY id",
    )?;
    let rows = stmt
        .query_map(params![habit_id], |row| {
            let details_str: Option<String> = row.get(1)?;
            Ok(LogEntry {
                operation: row.get(0)?,
                details: details_str.and_then(|s| serde_json::from_str(&s).ok()),
                created_at: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
