//! Cadence arithmetic and the current-streak calculator.
//!
//! A streak counts consecutive on-cadence periods (calendar days or ISO weeks)
//! ending at the latest checkoff. The walk runs backward from the latest
//! checkoff and stops at the first gap; it never looks past a break.

use chrono::{Datelike, IsoWeek, NaiveDate, NaiveDateTime};

use super::types::Cadence;

/// How two chronologically ordered checkoffs relate under a cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Both fall in the same day or ISO week.
    SamePeriod,
    /// `current` falls in the period right after `previous`.
    NextPeriod,
    /// At least one empty period lies between them.
    Gap,
}

/// Classify the pair `(previous, current)` where `previous <= current`.
pub fn step(cadence: Cadence, previous: &NaiveDateTime, current: &NaiveDateTime) -> Step {
    if same_period(cadence, previous, current) {
        return Step::SamePeriod;
    }
    let consecutive = match cadence {
        Cadence::Daily => previous.date().succ_opt() == Some(current.date()),
        Cadence::Weekly => follows_iso_week(previous.iso_week(), current.iso_week()),
    };
    if consecutive {
        Step::NextPeriod
    } else {
        Step::Gap
    }
}

/// Whether two instants fall in the same day (daily) or ISO week and week-year (weekly).
pub fn same_period(cadence: Cadence, a: &NaiveDateTime, b: &NaiveDateTime) -> bool {
    match cadence {
        Cadence::Daily => a.date() == b.date(),
        Cadence::Weekly => a.iso_week() == b.iso_week(),
    }
}

/// Whether `current` is the ISO week immediately after `previous`, including the
/// rollover from week 52/53 into week 1 of the next week-year.
pub fn follows_iso_week(previous: IsoWeek, current: IsoWeek) -> bool {
    if current.year() == previous.year() {
        current.week() == previous.week() + 1
    } else {
        current.year() == previous.year() + 1
            && current.week() == 1
            && previous.week() == weeks_in_iso_year(previous.year())
    }
}

/// Number of ISO weeks (52 or 53) in an ISO week-year.
pub fn weeks_in_iso_year(year: i32) -> u32 {
    // 28 December always lies in the last ISO week of its year.
    NaiveDate::from_ymd_opt(year, 12, 28)
        .map(|d| d.iso_week().week())
        .unwrap_or(52)
}

/// Current streak length for a checkoff collection.
///
/// The input may be unsorted and may contain exact duplicates. Pairs inside
/// one period neither extend nor break the streak.
pub fn current_streak(cadence: Cadence, checkoffs: &[NaiveDateTime]) -> u32 {
    if checkoffs.is_empty() {
        return 0;
    }

    let mut instants = checkoffs.to_vec();
    instants.sort_unstable();
    instants.dedup();

    let mut streak = 1;
    for pair in instants.windows(2).rev() {
        match step(cadence, &pair[0], &pair[1]) {
            Step::NextPeriod => streak += 1,
            Step::SamePeriod => continue,
            Step::Gap => break,
        }
    }
    streak
}
