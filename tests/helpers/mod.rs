#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use habitrack::db;
use habitrack::habit::{store, Cadence};
use rusqlite::Connection;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

/// 09:00 on the given calendar day.
pub fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

/// 09:00 on the given weekday of an ISO week.
pub fn iso_week_day(year: i32, week: u32, weekday: Weekday) -> NaiveDateTime {
    NaiveDate::from_isoywd_opt(year, week, weekday)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

/// Create a habit and record each checkoff in order. Returns the habit ID.
pub fn insert_habit(
    conn: &mut Connection,
    name: &str,
    cadence: Cadence,
    checkoffs: &[NaiveDateTime],
) -> String {
    let habit = store::create_habit(conn, name, "", cadence).unwrap();
    for at in checkoffs {
        store::record_checkoff(conn, habit.id(), *at).unwrap();
    }
    habit.id().to_string()
}
