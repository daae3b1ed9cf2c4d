//! Habits, checkoff validity, and streak computation.
//!
//! The [`HabitSource`] trait is the store handle the analysis layer reads
//! from. [`store::SqliteHabitStore`] serves it from the database; a slice of
//! [`Habit`]s serves it from memory.

pub mod store;
pub mod streak;
pub mod timestamp;
pub mod types;

use anyhow::Result;
use chrono::NaiveDateTime;

pub use types::{names_match, Cadence, Habit, ValidationError};

/// Read access to a collection of habits.
pub trait HabitSource {
    /// Every habit with its checkoff history, in storage (insertion) order.
    fn fetch_all_habits(&self) -> Result<Vec<Habit>>;

    /// Checkoffs of one habit in append order. Unknown identifiers yield an empty list.
    fn fetch_checkoffs(&self, habit_id: &str) -> Result<Vec<NaiveDateTime>>;

    /// Identifier of the habit whose name matches case-insensitively.
    fn resolve_identifier(&self, name: &str) -> Result<Option<String>>;

    /// Fetch one habit by identifier.
    fn fetch_habit(&self, habit_id: &str) -> Result<Option<Habit>> {
        Ok(self
            .fetch_all_habits()?
            .into_iter()
            .find(|habit| habit.id() == habit_id))
    }
}

impl HabitSource for [Habit] {
    fn fetch_all_habits(&self) -> Result<Vec<Habit>> {
        Ok(self.to_vec())
    }

    fn fetch_checkoffs(&self, habit_id: &str) -> Result<Vec<NaiveDateTime>> {
        Ok(self
            .iter()
            .find(|habit| habit.id() == habit_id)
            .map(|habit| habit.checkoffs().to_vec())
            .unwrap_or_default())
    }

    fn resolve_identifier(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .iter()
            .find(|habit| names_match(habit.name(), name))
            .map(|habit| habit.id().to_string()))
    }
}

impl HabitSource for Vec<Habit> {
    fn fetch_all_habits(&self) -> Result<Vec<Habit>> {
        self.as_slice().fetch_all_habits()
    }

    fn fetch_checkoffs(&self, habit_id: &str) -> Result<Vec<NaiveDateTime>> {
        self.as_slice().fetch_checkoffs(habit_id)
    }

    fn resolve_identifier(&self, name: &str) -> Result<Option<String>> {
        self.as_slice().resolve_identifier(name)
    }
}
