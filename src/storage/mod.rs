/// Storage layer for persisting habit data
///
/// This module handles all database operations using SQLite. It provides
/// a clean interface for storing and retrieving habits, entries, reminders,
/// and prompts, with toggle/upsert semantics for daily entries.

pub mod sqlite;
pub mod migrations;
pub mod seed;

// Re-export the main storage types
pub use sqlite::*;

use chrono::NaiveDate;
use thiserror::Error;
use crate::domain::{dates, Entry, Habit, HabitId, Prompt, Reminder};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Outcome of a binary toggle for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutcome {
    /// An entry was created for the day
    Added,
    /// The existing entry for the day was deleted
    Removed,
}

/// Trait defining the store contract consumed by the UI layer
///
/// All reads and writes go through these operations; consumers never touch
/// records in place and always receive owned copies. The central invariant
/// every implementation must uphold: at most one entry per (habit, date).
pub trait HabitStore {
    /// Insert or fully replace a habit record by identifier
    ///
    /// No validation beyond identifier presence; the caller owns the shape.
    fn upsert_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// List every habit, active or not, order unspecified
    fn list_all_habits(&self) -> Result<Vec<Habit>, StorageError>;

    /// List habits currently shown on the today view
    ///
    /// Filters on the `active` flag client-side after a full read, so the
    /// flag stays a genuine boolean with no indexed-query encoding.
    fn list_active_habits(&self) -> Result<Vec<Habit>, StorageError> {
        Ok(self
            .list_all_habits()?
            .into_iter()
            .filter(|h| h.active)
            .collect())
    }

    /// Toggle a binary habit for the given day
    ///
    /// If an entry exists for (habit, date) it is deleted and `Removed` is
    /// reported; otherwise one is created and `Added` is reported. The
    /// read-modify-write runs as a single transaction so concurrent callers
    /// cannot produce a duplicate entry.
    fn log_binary_on(&self, habit_id: &HabitId, date: NaiveDate) -> Result<LogOutcome, StorageError>;

    /// Toggle a binary habit for the current local day
    fn log_binary(&self, habit_id: &HabitId) -> Result<LogOutcome, StorageError> {
        self.log_binary_on(habit_id, dates::today_local())
    }

    /// Record an amount for the given day, overwriting in place
    ///
    /// If an entry exists for (habit, date) its amount and memo are replaced;
    /// otherwise a new entry is created. Never creates a second entry for
    /// the same day.
    fn log_amount_on(
        &self,
        habit_id: &HabitId,
        date: NaiveDate,
        amount: f64,
        memo: Option<&str>,
    ) -> Result<(), StorageError>;

    /// Record an amount for the current local day
    fn log_amount(&self, habit_id: &HabitId, amount: f64, memo: Option<&str>) -> Result<(), StorageError> {
        self.log_amount_on(habit_id, dates::today_local(), amount, memo)
    }

    /// Entries matching (habit, date) - zero or one by invariant, returned
    /// as a sequence for API uniformity
    fn entries_for(&self, habit_id: &HabitId, date: NaiveDate) -> Result<Vec<Entry>, StorageError>;

    /// All entries for a calendar day across habits
    fn entries_on(&self, date: NaiveDate) -> Result<Vec<Entry>, StorageError>;

    /// Seed the starter habit plan if the habit collection is empty
    ///
    /// Habits and their prompts are inserted in one all-or-nothing
    /// transaction. Safe to call on every boot; returns whether seeding
    /// occurred.
    fn seed_if_empty(&self) -> Result<bool, StorageError>;

    /// Insert or replace a reminder by identifier
    fn upsert_reminder(&self, reminder: &Reminder) -> Result<(), StorageError>;

    /// List reminders, optionally scoped to one habit
    fn list_reminders(&self, habit_id: Option<&HabitId>) -> Result<Vec<Reminder>, StorageError>;

    /// The prompt attached to a habit, if any
    fn prompt_for_habit(&self, habit_id: &HabitId) -> Result<Option<Prompt>, StorageError>;

    /// All prompts in the store
    fn list_prompts(&self) -> Result<Vec<Prompt>, StorageError>;
}
