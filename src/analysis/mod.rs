//! Aggregate views over a collection of habits.
//!
//! [`Analyzer`] is constructed with an explicit [`HabitSource`] and answers
//! listing, grouping, and longest-streak queries. Every query re-reads the
//! source and has no side effects, so callers may repeat them freely.

use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::habit::{Cadence, Habit, HabitSource};

/// Habits of one cadence split by whether they have ever been checked off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CadenceBreakdown {
    pub with_checkoffs: Vec<String>,
    pub without_checkoffs: Vec<String>,
}

/// Habits tied at the longest current streak for a cadence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LongestStreak {
    /// Empty when no habit of the cadence has a positive streak.
    pub names: Vec<String>,
    pub length: u32,
}

/// Streak of a single habit looked up by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HabitStreak {
    /// `None` when no habit matches the requested name.
    pub name: Option<String>,
    pub length: u32,
}

/// Checkoff history of a single habit looked up by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitHistory {
    pub name: String,
    pub cadence: Cadence,
    pub checkoffs: Vec<NaiveDateTime>,
}

/// One row of [`Analyzer::overview`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitOverview {
    pub name: String,
    pub description: String,
    pub cadence: Cadence,
    pub checkoff_count: usize,
    pub current_streak: u32,
    pub latest_checkoff: Option<NaiveDateTime>,
}

pub struct Analyzer<'s, S: HabitSource + ?Sized> {
    source: &'s S,
}

impl<'s, S: HabitSource + ?Sized> Analyzer<'s, S> {
    pub fn new(source: &'s S) -> Self {
        Self { source }
    }

    /// Names of every habit, checked off or not.
    pub fn all_habit_names(&self) -> Result<Vec<String>> {
        Ok(self
            .source
            .fetch_all_habits()?
            .iter()
            .map(|h| h.name().to_string())
            .collect())
    }

    /// Names of habits with at least one checkoff.
    pub fn checked_off_habit_names(&self) -> Result<Vec<String>> {
        Ok(self
            .source
            .fetch_all_habits()?
            .iter()
            .filter(|h| h.has_checkoffs())
            .map(|h| h.name().to_string())
            .collect())
    }

    /// Partition the habits of `cadence` by whether they have history.
    pub fn habits_by_cadence(&self, cadence: Cadence) -> Result<CadenceBreakdown> {
        let mut breakdown = CadenceBreakdown::default();
        for habit in self.habits_of(cadence)? {
            let name = habit.name().to_string();
            if habit.has_checkoffs() {
                breakdown.with_checkoffs.push(name);
            } else {
                breakdown.without_checkoffs.push(name);
            }
        }
        Ok(breakdown)
    }

    /// Every habit of `cadence` whose current streak equals the maximum positive
    /// streak, in storage order.
    pub fn longest_streak_for_cadence(&self, cadence: Cadence) -> Result<LongestStreak> {
        let mut best = LongestStreak::default();
        for habit in self.habits_of(cadence)? {
            let streak = habit.streak();
            if streak == 0 || streak < best.length {
                continue;
            }
            if streak > best.length {
                best.length = streak;
                best.names.clear();
            }
            best.names.push(habit.name().to_string());
        }
        Ok(best)
    }

    /// Current streak of the habit named `name` (case-insensitive).
    pub fn longest_streak_for_habit(&self, name: &str) -> Result<HabitStreak> {
        Ok(match self.lookup(name)? {
            Some(habit) => HabitStreak {
                length: habit.streak(),
                name: Some(habit.name().to_string()),
            },
            None => HabitStreak::default(),
        })
    }

    /// Checkoff history of the habit named `name` (case-insensitive).
    pub fn history_for_habit(&self, name: &str) -> Result<Option<HabitHistory>> {
        let Some(id) = self.source.resolve_identifier(name)? else {
            return Ok(None);
        };
        let Some(habit) = self.source.fetch_habit(&id)? else {
            return Ok(None);
        };
        let checkoffs = self.source.fetch_checkoffs(&id)?;
        Ok(Some(HabitHistory {
            name: habit.name().to_string(),
            cadence: habit.cadence(),
            checkoffs,
        }))
    }

    /// One summary row per habit, in storage order.
    pub fn overview(&self) -> Result<Vec<HabitOverview>> {
        Ok(self
            .source
            .fetch_all_habits()?
            .iter()
            .map(|habit| HabitOverview {
                name: habit.name().to_string(),
                description: habit.description().to_string(),
                cadence: habit.cadence(),
                checkoff_count: habit.checkoffs().len(),
                current_streak: habit.streak(),
                latest_checkoff: habit.checkoffs().iter().max().copied(),
            })
            .collect())
    }

    fn habits_of(&self, cadence: Cadence) -> Result<Vec<Habit>> {
        let mut habits = self.source.fetch_all_habits()?;
        habits.retain(|h| h.cadence() == cadence);
        Ok(habits)
    }

    fn lookup(&self, name: &str) -> Result<Option<Habit>> {
        match self.source.resolve_identifier(name)? {
            Some(id) => self.source.fetch_habit(&id),
            None => Ok(None),
        }
    }
}
