use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;
use std::io::Write;

use habitrack::habit::store;
use habitrack::habit::Habit;

/// Export format: every habit with its checkoff history.
#[derive(Debug, Serialize)]
struct ExportData {
    habits: Vec<Habit>,
}

/// Write all habits as pretty JSON to `out`. Returns the number exported.
pub fn export(conn: &Connection, out: &mut dyn Write) -> Result<usize> {
    let data = ExportData {
        habits: store::load_habits(conn)?,
    };

    writeln!(out, "{}", serde_json::to_string_pretty(&data)?)?;
    Ok(data.habits.len())
}
