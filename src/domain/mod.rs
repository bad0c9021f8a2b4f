/// Domain module containing core data types
///
/// This module defines the four record kinds the store persists (Habit,
/// Entry, Reminder, Prompt) and the local-date helpers shared across the
/// system.

pub mod habit;
pub mod entry;
pub mod reminder;
pub mod prompt;
pub mod types;
pub mod dates;

// Re-export public types for easy access
pub use habit::*;
pub use entry::*;
pub use reminder::*;
pub use prompt::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}
