/// Database migration management
///
/// This module handles creating and updating the SQLite database schema.
/// It ensures the database has all the required tables and indexes.

use rusqlite::Connection;
use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema
///
/// This creates all required tables and indexes if they don't exist.
/// It also sets up the version tracking for future migrations.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    // Create version tracking table first
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    // Check current version
    let current_version = get_current_version(conn)?;

    // Run migrations if needed
    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    }

    Ok(())
}

/// Get the current database schema version
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get::<_, i32>(0)
        })
        .unwrap_or(0); // Default to version 0 if no version record exists

    Ok(version)
}

/// Set the database schema version
fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }

    // Future migrations would go here:
    // if from_version < 2 {
    //     migration_v2(conn)?;
    // }

    Ok(())
}

/// Migration to version 1: Create initial tables
///
/// This creates the four record collections: habits, entries, reminders,
/// and prompts.
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS habits (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            icon TEXT,
            habit_type TEXT NOT NULL,
            unit TEXT,
            target INTEGER,
            category TEXT NOT NULL,
            frequency TEXT NOT NULL,
            active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TEXT NOT NULL,
            archived BOOLEAN NOT NULL DEFAULT FALSE
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS entries (
            id TEXT PRIMARY KEY,
            habit_id TEXT NOT NULL,
            date TEXT NOT NULL,
            amount REAL,
            memo TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY (habit_id) REFERENCES habits (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS reminders (
            id TEXT PRIMARY KEY,
            habit_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            time TEXT,
            lat REAL,
            lng REAL,
            radius_m REAL,
            enabled BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TEXT NOT NULL,
            FOREIGN KEY (habit_id) REFERENCES habits (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS prompts (
            id TEXT PRIMARY KEY,
            habit_id TEXT NOT NULL,
            lines TEXT NOT NULL,
            FOREIGN KEY (habit_id) REFERENCES habits (id)
        )",
        [],
    )?;

    create_indexes_v1(conn)?;

    tracing::info!("Applied migration v1: Created initial database schema");
    Ok(())
}

/// Create database indexes for version 1
fn create_indexes_v1(conn: &Connection) -> Result<(), StorageError> {
    // Secondary lookup keys on habits
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habits_category ON habits (category)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habits_active ON habits (active)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habits_created_at ON habits (created_at)",
        [],
    )?;

    // Secondary lookup keys on entries
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_entries_habit_id ON entries (habit_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_entries_date ON entries (date)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_entries_created_at ON entries (created_at)",
        [],
    )?;

    // Backstop for the one-entry-per-day invariant
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_entries_unique
         ON entries (habit_id, date)",
        [],
    )?;

    // Secondary lookup keys on reminders
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_reminders_habit_id ON reminders (habit_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_reminders_enabled ON reminders (enabled)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_reminders_created_at ON reminders (created_at)",
        [],
    )?;

    // Secondary lookup key on prompts
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_prompts_habit_id ON prompts (habit_id)",
        [],
    )?;

    tracing::info!("Created database indexes for v1");
    Ok(())
}
