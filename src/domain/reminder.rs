/// Reminder entity for time- or location-triggered alerts
///
/// Reminders are stored alongside habits but carry no scheduling logic in
/// the core; delivery belongs to the notification layer.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::domain::{HabitId, ReminderId};

/// What triggers a reminder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    /// Fires at a time of day, "HH:MM"
    Time,
    /// Fires when entering a geofence
    Location,
}

impl ReminderKind {
    /// String form used for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::Time => "time",
            ReminderKind::Location => "location",
        }
    }

    /// Parse the database string form back into the enum
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "time" => Some(ReminderKind::Time),
            "location" => Some(ReminderKind::Location),
            _ => None,
        }
    }
}

/// A geofence for location reminders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    pub lat: f64,
    pub lng: f64,
    pub radius_m: f64,
}

/// An optional alert bound to a habit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    /// Unique identifier for this reminder
    pub id: ReminderId,
    /// Which habit this reminder belongs to
    pub habit_id: HabitId,
    /// What triggers the reminder
    pub kind: ReminderKind,
    /// Time of day for time reminders, "HH:MM"
    pub time: Option<String>,
    /// Geofence for location reminders
    pub location: Option<Geofence>,
    /// Whether this reminder currently fires
    pub enabled: bool,
    /// When this reminder was created
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    /// Create a new enabled time-of-day reminder
    pub fn at_time(habit_id: HabitId, time: String) -> Self {
        Self {
            id: ReminderId::new(),
            habit_id,
            kind: ReminderKind::Time,
            time: Some(time),
            location: None,
            enabled: true,
            created_at: Utc::now(),
        }
    }

    /// Create a new enabled location reminder
    pub fn at_location(habit_id: HabitId, location: Geofence) -> Self {
        Self {
            id: ReminderId::new(),
            habit_id,
            kind: ReminderKind::Location,
            time: None,
            location: Some(location),
            enabled: true,
            created_at: Utc::now(),
        }
    }
}
