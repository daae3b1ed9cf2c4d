use habitrack::db;
use habitrack::habit::{store, Cadence};
use tempfile::TempDir;

#[test]
fn open_creates_new_db_at_nonexistent_path() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("subdir").join("habits.db");
    assert!(!db_path.exists());

    let conn = db::open_database(&db_path).unwrap();
    assert!(db_path.exists());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM habits", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn pragmas_are_applied() {
    let tmp = TempDir::new().unwrap();
    let conn = db::open_database(tmp.path().join("habits.db")).unwrap();

    let timeout: i64 = conn
        .pragma_query_value(None, "busy_timeout", |row| row.get(0))
        .unwrap();
    assert_eq!(timeout, 5000);

    let foreign_keys: i64 = conn
        .pragma_query_value(None, "foreign_keys", |row| row.get(0))
        .unwrap();
    assert_eq!(foreign_keys, 1);

    let journal: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .unwrap();
    assert_eq!(journal.to_lowercase(), "wal");
}

#[test]
fn data_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("habits.db");

    {
        let mut conn = db::open_database(&db_path).unwrap();
        let habit = store::create_habit(&mut conn, "Read", "", Cadence::Daily).unwrap();
        let at = habitrack::habit::timestamp::parse_timestamp("2024-10-01 07:30:00").unwrap();
        store::record_checkoff(&mut conn, habit.id(), at).unwrap();
    }

    let conn = db::open_database(&db_path).unwrap();
    let habits = store::load_habits(&conn).unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0].checkoffs().len(), 1);
    assert_eq!(habits[0].streak(), 1);
}

#[test]
fn health_check_counts_rows() {
    let mut conn = db::open_memory_database().unwrap();
    let habit = store::create_habit(&mut conn, "Read", "", Cadence::Daily).unwrap();
    let at = habitrack::habit::timestamp::parse_timestamp("2024-10-01").unwrap();
    store::record_checkoff(&mut conn, habit.id(), at).unwrap();

    let report = db::check_database_health(&conn).unwrap();
    assert!(report.integrity_ok);
    assert_eq!(report.schema_version, db::migrations::CURRENT_SCHEMA_VERSION);
    assert_eq!(report.habit_count, 1);
    assert_eq!(report.checkoff_count, 1);
    assert_eq!(report.log_count, 2);
}
