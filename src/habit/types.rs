//! Core habit type definitions.
//!
//! Defines [`Cadence`] (how often a habit repeats), [`Habit`] (identity plus
//! checkoff history, owning the checkoff-validity rule), and
//! [`ValidationError`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{streak, timestamp};

/// Required repetition interval of a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// Once per calendar day.
    Daily,
    /// Once per ISO week.
    Weekly,
}

impl Cadence {
    pub const ALL: [Cadence; 2] = [Cadence::Daily, Cadence::Weekly];

    /// SQL-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }

    /// Plural unit for streak lengths ("days" / "weeks").
    pub fn period_noun(&self) -> &'static str {
        match self {
            Self::Daily => "days",
            Self::Weekly => "weeks",
        }
    }
}

impl std::fmt::Display for Cadence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Cadence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            _ => Err(format!("unknown cadence: {s} (expected daily or weekly)")),
        }
    }
}

/// Rejections for habit names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("habit name must not be empty")]
    EmptyName,
    #[error("a habit named '{0}' already exists")]
    DuplicateName(String),
}

/// Case-insensitive name comparison used for lookups and uniqueness.
pub fn names_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// A tracked habit and its checkoff history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    id: String,
    name: String,
    description: String,
    cadence: Cadence,
    created_at: NaiveDateTime,
    /// Accepted checkoffs in append order.
    checkoffs: Vec<NaiveDateTime>,
}

impl Habit {
    /// Create a new habit with a fresh UUID v7 identifier and no checkoffs.
    pub fn create(
        name: &str,
        description: &str,
        cadence: Cadence,
    ) -> Result<Self, ValidationError> {
        let name = validate_name(name)?;
        Ok(Self {
            id: uuid::Uuid::now_v7().to_string(),
            name,
            description: description.trim().to_string(),
            cadence,
            created_at: timestamp::now(),
            checkoffs: Vec::new(),
        })
    }

    /// Rebuild a habit from a stored record. The history is taken as-is.
    pub fn restore(
        id: String,
        name: String,
        description: String,
        cadence: Cadence,
        created_at: NaiveDateTime,
        checkoffs: Vec<NaiveDateTime>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            cadence,
            created_at,
            checkoffs,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn checkoffs(&self) -> &[NaiveDateTime] {
        &self.checkoffs
    }

    pub fn has_checkoffs(&self) -> bool {
        !self.checkoffs.is_empty()
    }

    /// The most recently appended checkoff.
    pub fn latest_checkoff(&self) -> Option<NaiveDateTime> {
        self.checkoffs.last().copied()
    }

    /// Rename and re-describe. Cadence and history are untouched.
    pub fn edit(&mut self, new_name: &str, new_description: &str) -> Result<(), ValidationError> {
        self.name = validate_name(new_name)?;
        self.description = new_description.trim().to_string();
        Ok(())
    }

    /// Whether a checkoff at `at` would be accepted.
    ///
    /// Only the most recent checkoff is compared: a checkoff is redundant when it
    /// falls in the same day (daily) or ISO week (weekly) as that one.
    pub fn can_checkoff(&self, at: &NaiveDateTime) -> bool {
        match self.checkoffs.last() {
            Some(latest) => !streak::same_period(self.cadence, latest, at),
            None => true,
        }
    }

    /// Append a checkoff if it is not redundant. Returns whether it was accepted.
    pub fn checkoff(&mut self, at: NaiveDateTime) -> bool {
        if !self.can_checkoff(&at) {
            return false;
        }
        self.checkoffs.push(at);
        true
    }

    /// Check off at the current local time.
    pub fn checkoff_now(&mut self) -> bool {
        self.checkoff(timestamp::now())
    }

    /// Current streak length in periods of this habit's cadence.
    pub fn streak(&self) -> u32 {
        streak::current_streak(self.cadence, &self.checkoffs)
    }
}

impl std::fmt::Display for Habit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}, created {})",
            self.name,
            self.cadence,
            timestamp::format_timestamp(&self.created_at)
        )
    }
}

fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}
