/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents a recurring
/// activity the user tracks, along with its constructors.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::domain::{Category, DomainError, Frequency, HabitId, HabitType};

/// A habit represents something the user wants to do regularly
///
/// This is the core entity in the system. Each habit has a title, a type
/// that decides how it is logged (toggle vs. amount), a category for
/// grouping, and a frequency describing how often it should be done.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit, immutable once created
    pub id: HabitId,
    /// Display title (e.g., "Water after each drink")
    pub title: String,
    /// Icon glyph shown next to the title (emoji or short code)
    pub icon: Option<String>,
    /// How this habit is measured when logged
    pub habit_type: HabitType,
    /// Unit for the amount (e.g., "min", "glasses", "problems")
    pub unit: Option<String>,
    /// Optional numeric target (e.g., 30 for "30 min")
    pub target: Option<u32>,
    /// Category for grouping on the today view
    pub category: Category,
    /// How often this habit should be performed
    pub frequency: Frequency,
    /// Whether this habit is shown on the today view
    pub active: bool,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
    /// Whether this habit has been archived
    pub archived: bool,
}

impl Habit {
    /// Create a new active habit with a fresh ID
    ///
    /// The frequency is validated; everything else is taken as given since
    /// upsert callers own the record shape.
    pub fn new(
        title: String,
        icon: Option<String>,
        habit_type: HabitType,
        unit: Option<String>,
        target: Option<u32>,
        category: Category,
        frequency: Frequency,
    ) -> Result<Self, DomainError> {
        frequency.validate()?;

        Ok(Self {
            id: HabitId::new(),
            title,
            icon,
            habit_type,
            unit,
            target,
            category,
            frequency,
            active: true,
            created_at: Utc::now(),
            archived: false,
        })
    }

    /// Create a habit from existing data (used when loading from database)
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: HabitId,
        title: String,
        icon: Option<String>,
        habit_type: HabitType,
        unit: Option<String>,
        target: Option<u32>,
        category: Category,
        frequency: Frequency,
        active: bool,
        created_at: DateTime<Utc>,
        archived: bool,
    ) -> Self {
        Self {
            id,
            title,
            icon,
            habit_type,
            unit,
            target,
            category,
            frequency,
            active,
            created_at,
            archived,
        }
    }

    /// Check if this habit has a numeric target
    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    /// Get a display string for the target (e.g., "30 min")
    pub fn target_display(&self) -> Option<String> {
        match (self.target, &self.unit) {
            (Some(value), Some(unit)) => Some(format!("{} {}", value, unit)),
            (Some(value), None) => Some(value.to_string()),
            _ => None,
        }
    }

    /// Soft-deactivate this habit so it no longer appears on the today view
    ///
    /// Habits are never physically deleted in normal flow; history stays
    /// queryable through their entries.
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}
