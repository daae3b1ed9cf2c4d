//! CLI `analyse` command: listing and longest-streak queries.

use anyhow::Result;
use clap::Subcommand;
use rusqlite::Connection;
use serde::Serialize;
use std::io::Write;

use habitrack::analysis::Analyzer;
use habitrack::habit::store::SqliteHabitStore;
use habitrack::habit::Cadence;

#[derive(Debug, Clone, Subcommand)]
pub enum AnalyseQuery {
    /// Show all habits
    All,
    /// Show all habits checked off at least once
    CheckedOff,
    /// Show habits of one cadence, split by whether they were checked off
    Cadence { cadence: Cadence },
    /// Show habits of one cadence checked off at least once
    CheckedOffCadence { cadence: Cadence },
    /// Show the habits with the longest current streak for a cadence
    Longest { cadence: Cadence },
    /// Show the current streak of one habit
    Habit { name: String },
}

fn print_json(out: &mut dyn Write, value: &impl Serialize) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "None".to_string()
    } else {
        names.join(", ")
    }
}

/// Run one analysis query and print the result as text or JSON.
pub fn analyse(conn: &Connection, out: &mut dyn Write, query: &AnalyseQuery, json: bool) -> Result<()> {
    let store = SqliteHabitStore::new(conn);
    let analyzer = Analyzer::new(&store);

    match query {
        AnalyseQuery::All => {
            let names = analyzer.all_habit_names()?;
            if json {
                return print_json(out, &names);
            }
            if names.is_empty() {
                writeln!(out, "There are no currently tracked habits.")?;
            } else {
                writeln!(out, "These are all your currently tracked habits: {}", names.join(", "))?;
            }
        }
        AnalyseQuery::CheckedOff => {
            let names = analyzer.checked_off_habit_names()?;
            if json {
                return print_json(out, &names);
            }
            if names.is_empty() {
                writeln!(out, "There are no habits with a checkoff yet.")?;
            } else {
                writeln!(
                    out,
                    "These are your habits with at least one checkoff: {}",
                    names.join(", ")
                )?;
            }
        }
        AnalyseQuery::Cadence { cadence } => {
            let breakdown = analyzer.habits_by_cadence(*cadence)?;
            if json {
                return print_json(out, &breakdown);
            }
            writeln!(
                out,
                "Your {cadence} habits with checkoffs are: {}",
                join_or_none(&breakdown.with_checkoffs)
            )?;
            writeln!(
                out,
                "Your {cadence} habits without checkoffs are: {}",
                join_or_none(&breakdown.without_checkoffs)
            )?;
        }
        AnalyseQuery::CheckedOffCadence { cadence } => {
            let names = analyzer.habits_by_cadence(*cadence)?.with_checkoffs;
            if json {
                return print_json(out, &names);
            }
            if names.is_empty() {
                writeln!(out, "There are no {cadence} habits with at least one checkoff.")?;
            } else {
                writeln!(
                    out,
                    "Your {cadence} habits with at least one checkoff are: {}",
                    names.join(", ")
                )?;
            }
        }
        AnalyseQuery::Longest { cadence } => {
            let best = analyzer.longest_streak_for_cadence(*cadence)?;
            if json {
                return print_json(out, &best);
            }
            if best.names.is_empty() {
                writeln!(out, "There are no {cadence} habits with a streak.")?;
            } else {
                writeln!(
                    out,
                    "Your {cadence} habits with the longest streak are '{}' with {} {}.",
                    best.names.join(", "),
                    best.length,
                    cadence.period_noun()
                )?;
            }
        }
        AnalyseQuery::Habit { name } => {
            let streak = analyzer.longest_streak_for_habit(name)?;
            if json {
                return print_json(out, &streak);
            }
            match (&streak.name, streak.length) {
                (None, _) => writeln!(out, "There is no habit named '{name}'.")?,
                (Some(found), 0) => writeln!(out, "There is no streak for habit '{found}'.")?,
                (Some(found), length) => {
                    writeln!(out, "The current streak for your habit '{found}' is: {length}")?
                }
            }
        }
    }

    Ok(())
}
