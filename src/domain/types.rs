/// Core types and enums used throughout the domain layer
///
/// This module defines the fundamental types like Category, HabitType, and
/// Frequency, plus the typed ID wrappers used by Habit, Entry, Reminder,
/// and Prompt.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a habit
///
/// This is a wrapper around UUID to provide type safety - you can't accidentally
/// pass a habit ID where an entry ID is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a habit ID from a string (useful for database loading)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Convert to string representation
    pub fn to_string(&self) -> String {
        self.0.to_string()
    }
}

/// Unique identifier for a daily entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub Uuid);

impl EntryId {
    /// Generate a new random entry ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an entry ID from a string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Convert to string representation
    pub fn to_string(&self) -> String {
        self.0.to_string()
    }
}

/// Unique identifier for a reminder
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReminderId(pub Uuid);

impl ReminderId {
    /// Generate a new random reminder ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a reminder ID from a string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Convert to string representation
    pub fn to_string(&self) -> String {
        self.0.to_string()
    }
}

/// Unique identifier for a guided-logging prompt
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PromptId(pub Uuid);

impl PromptId {
    /// Generate a new random prompt ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a prompt ID from a string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Convert to string representation
    pub fn to_string(&self) -> String {
        self.0.to_string()
    }
}

/// How a habit is measured when it is logged
///
/// Binary habits toggle done/not-done for the day; the other three carry
/// a numeric amount (count, minutes, or quantity in the habit's unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitType {
    /// Done or not done for the day
    Binary,
    /// A running count (e.g., glasses of water)
    Counter,
    /// A duration, typically minutes
    Duration,
    /// A measured quantity in the habit's unit
    Quantity,
}

impl HabitType {
    /// String form used for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitType::Binary => "binary",
            HabitType::Counter => "counter",
            HabitType::Duration => "duration",
            HabitType::Quantity => "quantity",
        }
    }

    /// Parse the database string form back into the enum
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "binary" => Some(HabitType::Binary),
            "counter" => Some(HabitType::Counter),
            "duration" => Some(HabitType::Duration),
            "quantity" => Some(HabitType::Quantity),
            _ => None,
        }
    }
}

/// Categories grouping habits into the areas of the memory plan
///
/// This is a closed enumeration - the seed plan defines exactly these
/// groups and the today view groups habits by them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Alcohol management
    Alcohol,
    /// Sleep stabilization
    Sleep,
    /// Daily memory primers
    Primers,
    /// Professional / AI practice
    ProAI,
    /// Supplement routine
    Supplements,
    /// Fitness and blood flow
    Fitness,
    /// Structured brain training (dual n-back)
    NBack,
    /// Memory palace practice
    MemoryPalace,
    /// Social memory exercises
    Social,
    /// Weekly reflection
    Reflection,
    /// Long-term resets
    LongTerm,
}

impl Category {
    /// Get the display name for this category
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Alcohol => "Alcohol",
            Category::Sleep => "Sleep",
            Category::Primers => "Primers",
            Category::ProAI => "Pro / AI",
            Category::Supplements => "Supplements",
            Category::Fitness => "Fitness",
            Category::NBack => "N-Back",
            Category::MemoryPalace => "Memory Palace",
            Category::Social => "Social",
            Category::Reflection => "Reflection",
            Category::LongTerm => "Long Term",
        }
    }

    /// String form used for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Alcohol => "alcohol",
            Category::Sleep => "sleep",
            Category::Primers => "primers",
            Category::ProAI => "proai",
            Category::Supplements => "supplements",
            Category::Fitness => "fitness",
            Category::NBack => "nback",
            Category::MemoryPalace => "memorypalace",
            Category::Social => "social",
            Category::Reflection => "reflection",
            Category::LongTerm => "longterm",
        }
    }

    /// Parse the database string form back into the enum
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "alcohol" => Some(Category::Alcohol),
            "sleep" => Some(Category::Sleep),
            "primers" => Some(Category::Primers),
            "proai" => Some(Category::ProAI),
            "supplements" => Some(Category::Supplements),
            "fitness" => Some(Category::Fitness),
            "nback" => Some(Category::NBack),
            "memorypalace" => Some(Category::MemoryPalace),
            "social" => Some(Category::Social),
            "reflection" => Some(Category::Reflection),
            "longterm" => Some(Category::LongTerm),
            _ => None,
        }
    }
}

/// How often a habit should be performed
///
/// Stored as tagged JSON in the database so new modes can be added without
/// schema changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Frequency {
    /// Every single day
    Daily,
    /// Specific days of the week, 1 = Monday .. 7 = Sunday
    Weekly { days_of_week: Vec<u8> },
    /// Free-form schedule described by an optional note
    Custom {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
}

impl Frequency {
    /// Validate that a frequency value is reasonable
    pub fn validate(&self) -> Result<(), crate::domain::DomainError> {
        if let Frequency::Weekly { days_of_week } = self {
            if days_of_week.is_empty() {
                return Err(crate::domain::DomainError::InvalidFrequency(
                    "Weekly frequency must specify at least one day".to_string()
                ));
            }
            for day in days_of_week {
                if *day < 1 || *day > 7 {
                    return Err(crate::domain::DomainError::InvalidFrequency(
                        format!("Weekday must be 1-7, got {}", day)
                    ));
                }
            }
        }
        Ok(())
    }
}
