//! Habit tracking with cadence-aware streaks.
//!
//! habitrack records recurring habits, each with a cadence and a history of
//! completion timestamps ("checkoffs"), and answers streak questions about
//! them:
//!
//! | Cadence | Redundant checkoff | Streak period |
//! |---------|--------------------|---------------|
//! | **Daily** | same calendar day as the latest checkoff | calendar day |
//! | **Weekly** | same ISO week and week-year as the latest checkoff | ISO week, rolling over week 52/53 → 1 |
//!
//! # Architecture
//!
//! - **Core**: [`habit::Habit`] owns the checkoff-validity rule;
//!   [`habit::streak`] computes the current streak as a pure function of
//!   cadence and history.
//! - **Analysis**: [`analysis::Analyzer`] folds streaks over every habit of a
//!   [`habit::HabitSource`] into listing and longest-streak views.
//! - **Storage**: SQLite with forward-only migrations and an audit log.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`db`]: SQLite database initialization, schema, migrations, and health checks
//! - [`habit`]: Habit entity, streak calculator, timestamp codec, and SQLite store
//! - [`analysis`]: Aggregate queries over a habit collection

pub mod analysis;
pub mod config;
pub mod db;
pub mod habit;
