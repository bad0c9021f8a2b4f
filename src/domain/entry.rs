/// Entry entity for daily habit logging
///
/// This module defines the Entry struct that represents one day's logged
/// record for a habit. The store enforces that at most one entry exists
/// per (habit, date) pair.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use crate::domain::{EntryId, HabitId};

/// A single day's logged record for one habit
///
/// Binary habits create an entry with no amount; counter, duration, and
/// quantity habits carry an amount in the habit's unit and an optional memo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier for this entry
    pub id: EntryId,
    /// Which habit this entry is for
    pub habit_id: HabitId,
    /// The local calendar day this entry belongs to
    pub date: NaiveDate,
    /// Amount achieved, for non-binary habit types
    pub amount: Option<f64>,
    /// Free-form memo attached to this day's log
    pub memo: Option<String>,
    /// When this entry was created
    pub created_at: DateTime<Utc>,
}

impl Entry {
    /// Create a new entry for the given habit and day
    pub fn new(habit_id: HabitId, date: NaiveDate, amount: Option<f64>, memo: Option<String>) -> Self {
        Self {
            id: EntryId::new(),
            habit_id,
            date,
            amount,
            memo,
            created_at: Utc::now(),
        }
    }

    /// Create an entry from existing data (used when loading from database)
    pub fn from_existing(
        id: EntryId,
        habit_id: HabitId,
        date: NaiveDate,
        amount: Option<f64>,
        memo: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            habit_id,
            date,
            amount,
            memo,
            created_at,
        }
    }

    /// Check if this entry carries a numeric amount
    pub fn has_amount(&self) -> bool {
        self.amount.is_some()
    }
}
