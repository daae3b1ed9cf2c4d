//! CLI habit commands: add, check off, edit, delete, list, history.
//!
//! Each command writes user-facing text to `out` so the interactive menu and
//! the one-shot subcommands share the same wording.

use anyhow::{bail, Result};
use chrono::NaiveDateTime;
use rusqlite::Connection;
use std::io::Write;

use habitrack::analysis::Analyzer;
use habitrack::habit::store::{self, CheckoffOutcome, SqliteHabitStore};
use habitrack::habit::timestamp::format_timestamp;
use habitrack::habit::{Cadence, Habit};

fn require_habit(conn: &Connection, name: &str) -> Result<Habit> {
    match store::find_habit_by_name(conn, name)? {
        Some(habit) => Ok(habit),
        None => bail!("no habit named '{name}'"),
    }
}

pub fn add(
    conn: &mut Connection,
    out: &mut dyn Write,
    name: &str,
    description: &str,
    cadence: Cadence,
) -> Result<()> {
    let habit = store::create_habit(conn, name, description, cadence)?;
    writeln!(out, "Your new habit '{}' was added successfully!", habit.name())?;
    Ok(())
}

pub fn checkoff(
    conn: &mut Connection,
    out: &mut dyn Write,
    name: &str,
    at: NaiveDateTime,
) -> Result<()> {
    let habit = require_habit(conn, name)?;
    match store::record_checkoff(conn, habit.id(), at)? {
        CheckoffOutcome::Accepted => writeln!(
            out,
            "Your habit '{}' was checked off successfully on {}!",
            habit.name(),
            format_timestamp(&at)
        )?,
        CheckoffOutcome::Rejected => writeln!(
            out,
            "Your habit '{}' was already checked off in the given periodicity.",
            habit.name()
        )?,
        CheckoffOutcome::UnknownHabit => bail!("no habit named '{name}'"),
    }
    Ok(())
}

/// Rename and/or re-describe. `None` keeps the current value.
pub fn edit(
    conn: &mut Connection,
    out: &mut dyn Write,
    name: &str,
    new_name: Option<&str>,
    new_description: Option<&str>,
) -> Result<()> {
    let habit = require_habit(conn, name)?;
    let new_name = new_name.unwrap_or(habit.name());
    let new_description = new_description.unwrap_or(habit.description());

    match store::update_habit(conn, habit.id(), new_name, new_description)? {
        Some(updated) => writeln!(out, "Your habit '{}' was edited successfully!", updated.name())?,
        None => bail!("no habit named '{name}'"),
    }
    Ok(())
}

pub fn delete(conn: &mut Connection, out: &mut dyn Write, name: &str) -> Result<()> {
    let habit = require_habit(conn, name)?;
    if store::delete_habit(conn, habit.id())? {
        writeln!(out, "Your habit '{}' was deleted successfully!", habit.name())?;
    }
    Ok(())
}

/// Print one line per habit with its current streak.
pub fn list(conn: &Connection, out: &mut dyn Write) -> Result<()> {
    let store = SqliteHabitStore::new(conn);
    let rows = Analyzer::new(&store).overview()?;

    if rows.is_empty() {
        writeln!(out, "There are no currently tracked habits.")?;
        return Ok(());
    }

    writeln!(out, "{:<28} {:<8} {:>7} {:>9}  Latest", "Habit", "Cadence", "Streak", "Checkoffs")?;
    writeln!(out, "{}", "=".repeat(72))?;
    for row in rows {
        let latest = row
            .latest_checkoff
            .map(|ts| format_timestamp(&ts))
            .unwrap_or_else(|| "-".into());
        writeln!(
            out,
            "{:<28} {:<8} {:>7} {:>9}  {}",
            row.name, row.cadence, row.current_streak, row.checkoff_count, latest
        )?;
    }
    Ok(())
}

/// Print the checkoff history of one habit, optionally with its audit log.
pub fn history(conn: &Connection, out: &mut dyn Write, name: &str, with_log: bool) -> Result<()> {
    let store = SqliteHabitStore::new(conn);
    let Some(history) = Analyzer::new(&store).history_for_habit(name)? else {
        bail!("no habit named '{name}'");
    };

    writeln!(out, "Habit: {} ({})", history.name, history.cadence)?;
    writeln!(out, "{}", "=".repeat(40))?;
    if history.checkoffs.is_empty() {
        writeln!(out, "  No checkoffs yet.")?;
    }
    for at in &history.checkoffs {
        writeln!(out, "  {}", format_timestamp(at))?;
    }

    if with_log {
        let habit = require_habit(conn, name)?;
        let log = store::read_audit_log(conn, habit.id())?;
        if !log.is_empty() {
            writeln!(out)?;
            writeln!(out, "Audit Log:")?;
            for entry in log {
                let details = entry
                    .details
                    .as_ref()
                    .map(|d| d.to_string())
                    .unwrap_or_default();
                writeln!(out, "  {} [{}] {}", entry.created_at, entry.operation, details)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use habitrack::habit::ValidationError;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 10, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn text(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn add_then_duplicate() {
        let mut conn = habitrack::db::open_memory_database().unwrap();
        let mut out = Vec::new();
        add(&mut conn, &mut out, "Read", "", Cadence::Daily).unwrap();
        assert!(text(out).contains("'Read' was added successfully"));

        let mut out = Vec::new();
        let err = add(&mut conn, &mut out, "read", "", Cadence::Daily).unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
    }

    #[test]
    fn checkoff_messages() {
        let mut conn = habitrack::db::open_memory_database().unwrap();
        add(&mut conn, &mut Vec::new(), "Read", "", Cadence::Daily).unwrap();

        let mut out = Vec::new();
        checkoff(&mut conn, &mut out, "read", day(1)).unwrap();
        checkoff(&mut conn, &mut out, "Read", day(1)).unwrap();
        let printed = text(out);
        assert!(printed.contains("checked off successfully on 2024-10-01 00:00:00"));
        assert!(printed.contains("already checked off in the given periodicity"));

        assert!(checkoff(&mut conn, &mut Vec::new(), "Swim", day(1)).is_err());
    }

    #[test]
    fn edit_keeps_unspecified_fields() {
        let mut conn = habitrack::db::open_memory_database().unwrap();
        add(&mut conn, &mut Vec::new(), "Read", "Books", Cadence::Weekly).unwrap();
        edit(&mut conn, &mut Vec::new(), "Read", Some("Read more"), None).unwrap();

        let habit = store::find_habit_by_name(&conn, "read more").unwrap().unwrap();
        assert_eq!(habit.description(), "Books");
        assert_eq!(habit.cadence(), Cadence::Weekly);
    }

    #[test]
    fn list_and_history_output() {
        let mut conn = habitrack::db::open_memory_database().unwrap();
        add(&mut conn, &mut Vec::new(), "Walk", "", Cadence::Daily).unwrap();
        checkoff(&mut conn, &mut Vec::new(), "Walk", day(1)).unwrap();
        checkoff(&mut conn, &mut Vec::new(), "Walk", day(2)).unwrap();

        let mut out = Vec::new();
        list(&conn, &mut out).unwrap();
        let listed = text(out);
        assert!(listed.contains("Walk"));
        assert!(listed.contains("2024-10-02 00:00:00"));

        let mut out = Vec::new();
        history(&conn, &mut out, "walk", true).unwrap();
        let shown = text(out);
        assert!(shown.contains("2024-10-01 00:00:00"));
        assert!(shown.contains("[checkoff]"));
    }

    #[test]
    fn delete_removes_habit() {
        let mut conn = habitrack::db::open_memory_database().unwrap();
        add(&mut conn, &mut Vec::new(), "Walk", "", Cadence::Daily).unwrap();
        let mut out = Vec::new();
        delete(&mut conn, &mut out, "WALK").unwrap();
        assert!(text(out).contains("'Walk' was deleted successfully"));
        assert!(store::find_habit_by_name(&conn, "Walk").unwrap().is_none());
    }
}
