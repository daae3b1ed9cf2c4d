mod helpers;

use chrono::Weekday;
use habitrack::analysis::{Analyzer, LongestStreak};
use habitrack::habit::store::SqliteHabitStore;
use habitrack::habit::Cadence;
use helpers::{day, insert_habit, iso_week_day, test_db};

#[test]
fn longest_daily_streak_reports_every_tie() {
    let mut conn = test_db();
    let three_days = [day(2024, 10, 1), day(2024, 10, 2), day(2024, 10, 3)];
    insert_habit(&mut conn, "A", Cadence::Daily, &three_days);
    insert_habit(&mut conn, "B", Cadence::Daily, &[day(2024, 10, 2)]);
    insert_habit(&mut conn, "C", Cadence::Daily, &three_days);

    let store = SqliteHabitStore::new(&conn);
    let longest = Analyzer::new(&store)
        .longest_streak_for_cadence(Cadence::Daily)
        .unwrap();

    assert_eq!(
        longest,
        LongestStreak {
            names: vec!["A".into(), "C".into()],
            length: 3,
        }
    );
}

#[test]
fn longest_streak_ignores_other_cadences() {
    let mut conn = test_db();
    insert_habit(
        &mut conn,
        "Run",
        Cadence::Daily,
        &[day(2024, 10, 1), day(2024, 10, 2)],
    );
    insert_habit(
        &mut conn,
        "Clean",
        Cadence::Weekly,
        &[
            iso_week_day(2024, 1, Weekday::Mon),
            iso_week_day(2024, 2, Weekday::Mon),
            iso_week_day(2024, 3, Weekday::Mon),
        ],
    );

    let store = SqliteHabitStore::new(&conn);
    let analyzer = Analyzer::new(&store);

    let daily = analyzer.longest_streak_for_cadence(Cadence::Daily).unwrap();
    assert_eq!((daily.names, daily.length), (vec!["Run".to_string()], 2));

    let weekly = analyzer.longest_streak_for_cadence(Cadence::Weekly).unwrap();
    assert_eq!((weekly.names, weekly.length), (vec!["Clean".to_string()], 3));
}

#[test]
fn no_positive_streak_means_no_winner() {
    let mut conn = test_db();
    insert_habit(&mut conn, "Idle", Cadence::Weekly, &[]);

    let store = SqliteHabitStore::new(&conn);
    let analyzer = Analyzer::new(&store);
    assert_eq!(
        analyzer.longest_streak_for_cadence(Cadence::Weekly).unwrap(),
        LongestStreak::default()
    );
    assert_eq!(
        analyzer.longest_streak_for_cadence(Cadence::Daily).unwrap(),
        LongestStreak::default()
    );
}

#[test]
fn unknown_habit_has_absent_name_and_zero_streak() {
    let conn = test_db();
    let store = SqliteHabitStore::new(&conn);
    let streak = Analyzer::new(&store)
        .longest_streak_for_habit("Unknown Name")
        .unwrap();
    assert_eq!(streak.name, None);
    assert_eq!(streak.length, 0);
}

#[test]
fn habit_lookup_is_case_insensitive() {
    let mut conn = test_db();
    insert_habit(
        &mut conn,
        "Morning Walk",
        Cadence::Daily,
        &[day(2024, 10, 1), day(2024, 10, 2)],
    );

    let store = SqliteHabitStore::new(&conn);
    let streak = Analyzer::new(&store)
        .longest_streak_for_habit("morning walk")
        .unwrap();
    assert_eq!(streak.name.as_deref(), Some("Morning Walk"));
    assert_eq!(streak.length, 2);
}

#[test]
fn listings_follow_storage_order() {
    let mut conn = test_db();
    insert_habit(&mut conn, "Zebra", Cadence::Daily, &[day(2024, 10, 1)]);
    insert_habit(&mut conn, "Apple", Cadence::Weekly, &[]);
    insert_habit(&mut conn, "Mango", Cadence::Daily, &[]);

    let store = SqliteHabitStore::new(&conn);
    let analyzer = Analyzer::new(&store);

    assert_eq!(analyzer.all_habit_names().unwrap(), ["Zebra", "Apple", "Mango"]);
    assert_eq!(analyzer.checked_off_habit_names().unwrap(), ["Zebra"]);

    let daily = analyzer.habits_by_cadence(Cadence::Daily).unwrap();
    assert_eq!(daily.with_checkoffs, ["Zebra"]);
    assert_eq!(daily.without_checkoffs, ["Mango"]);
}

#[test]
fn in_memory_collection_gives_same_answers_as_database() {
    let mut conn = test_db();
    let days = [day(2024, 10, 1), day(2024, 10, 2)];
    insert_habit(&mut conn, "A", Cadence::Daily, &days);
    insert_habit(&mut conn, "B", Cadence::Daily, &days);

    let store = SqliteHabitStore::new(&conn);
    let from_db = Analyzer::new(&store)
        .longest_streak_for_cadence(Cadence::Daily)
        .unwrap();

    let habits = habitrack::habit::store::load_habits(&conn).unwrap();
    let from_memory = Analyzer::new(habits.as_slice())
        .longest_streak_for_cadence(Cadence::Daily)
        .unwrap();

    assert_eq!(from_db, from_memory);
}
