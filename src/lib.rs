/// Public library interface for the Mnemo habit tracker core
///
/// Two subsystems form the core: the local store (durable habit/entry
/// persistence with toggle/upsert semantics) and the offline cache
/// controller (versioned app-shell caching with stale-while-revalidate).
/// They share nothing but the date helpers; the controller is
/// schema-agnostic.

use thiserror::Error;

pub mod domain;
pub mod storage;
pub mod cache;
pub mod notify;
pub mod history;

// Re-export the types most consumers need
pub use domain::*;
pub use storage::{HabitStore, LogOutcome, SqliteStore, StorageError};
pub use history::{average_pct, seven_day_history, DayStat};

/// Errors that can occur at the application boundary
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
