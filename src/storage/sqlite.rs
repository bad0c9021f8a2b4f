/// SQLite implementation of the habit store contract
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habit data. It handles all SQL queries and data conversion,
/// and runs every read-modify-write as a transaction so the one-entry-per-day
/// invariant holds even with overlapping callers.

use std::path::PathBuf;
use rusqlite::{params, Connection, OptionalExtension};
use chrono::NaiveDate;

use crate::domain::{
    dates, Category, Entry, EntryId, Geofence, Habit, HabitId, HabitType, Prompt, PromptId,
    Reminder, ReminderId, ReminderKind,
};
use crate::storage::{migrations, seed, HabitStore, LogOutcome, StorageError};

/// SQLite-based store implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the operations defined in the HabitStore trait.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SQLite store instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Unavailable(format!("Failed to open database: {}", e)))?;

        // Enable foreign key constraints
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Unavailable(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite store initialized at: {:?}", db_path);

        Ok(Self { conn })
    }

    fn invalid_column<E: std::fmt::Display>(idx: usize, what: &str) -> impl FnOnce(E) -> rusqlite::Error + '_ {
        move |_| rusqlite::Error::InvalidColumnType(idx, what.to_string(), rusqlite::types::Type::Text)
    }

    /// Map a habits row in SELECT column order:
    /// id, title, icon, habit_type, unit, target, category, frequency,
    /// active, created_at, archived
    fn habit_from_row(row: &rusqlite::Row) -> rusqlite::Result<Habit> {
        let id_str: String = row.get(0)?;
        let id = HabitId::from_string(&id_str).map_err(Self::invalid_column(0, "Invalid UUID"))?;

        let type_str: String = row.get(3)?;
        let habit_type = HabitType::parse(&type_str).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(3, "Invalid habit type".to_string(), rusqlite::types::Type::Text)
        })?;

        let category_str: String = row.get(6)?;
        let category = Category::parse(&category_str).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(6, "Invalid category".to_string(), rusqlite::types::Type::Text)
        })?;

        let frequency_json: String = row.get(7)?;
        let frequency =
            serde_json::from_str(&frequency_json).map_err(Self::invalid_column(7, "Invalid frequency"))?;

        let created_at_str: String = row.get(9)?;
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(Self::invalid_column(9, "Invalid datetime"))?
            .with_timezone(&chrono::Utc);

        Ok(Habit::from_existing(
            id,
            row.get(1)?, // title
            row.get(2)?, // icon
            habit_type,
            row.get(4)?, // unit
            row.get(5)?, // target
            category,
            frequency,
            row.get(8)?, // active
            created_at,
            row.get(10)?, // archived
        ))
    }

    /// Map an entries row in SELECT column order:
    /// id, habit_id, date, amount, memo, created_at
    fn entry_from_row(row: &rusqlite::Row) -> rusqlite::Result<Entry> {
        let id_str: String = row.get(0)?;
        let id = EntryId::from_string(&id_str).map_err(Self::invalid_column(0, "Invalid UUID"))?;

        let habit_id_str: String = row.get(1)?;
        let habit_id =
            HabitId::from_string(&habit_id_str).map_err(Self::invalid_column(1, "Invalid UUID"))?;

        let date_str: String = row.get(2)?;
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(Self::invalid_column(2, "Invalid date"))?;

        let created_at_str: String = row.get(5)?;
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(Self::invalid_column(5, "Invalid datetime"))?
            .with_timezone(&chrono::Utc);

        Ok(Entry::from_existing(
            id,
            habit_id,
            date,
            row.get(3)?, // amount
            row.get(4)?, // memo
            created_at,
        ))
    }

    /// Map a reminders row in SELECT column order:
    /// id, habit_id, kind, time, lat, lng, radius_m, enabled, created_at
    fn reminder_from_row(row: &rusqlite::Row) -> rusqlite::Result<Reminder> {
        let id_str: String = row.get(0)?;
        let id = ReminderId::from_string(&id_str).map_err(Self::invalid_column(0, "Invalid UUID"))?;

        let habit_id_str: String = row.get(1)?;
        let habit_id =
            HabitId::from_string(&habit_id_str).map_err(Self::invalid_column(1, "Invalid UUID"))?;

        let kind_str: String = row.get(2)?;
        let kind = ReminderKind::parse(&kind_str).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(2, "Invalid reminder kind".to_string(), rusqlite::types::Type::Text)
        })?;

        let lat: Option<f64> = row.get(4)?;
        let lng: Option<f64> = row.get(5)?;
        let radius_m: Option<f64> = row.get(6)?;
        let location = match (lat, lng, radius_m) {
            (Some(lat), Some(lng), Some(radius_m)) => Some(Geofence { lat, lng, radius_m }),
            _ => None,
        };

        let created_at_str: String = row.get(8)?;
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(Self::invalid_column(8, "Invalid datetime"))?
            .with_timezone(&chrono::Utc);

        Ok(Reminder {
            id,
            habit_id,
            kind,
            time: row.get(3)?,
            location,
            enabled: row.get(7)?,
            created_at,
        })
    }

    /// Map a prompts row in SELECT column order: id, habit_id, lines
    fn prompt_from_row(row: &rusqlite::Row) -> rusqlite::Result<Prompt> {
        let id_str: String = row.get(0)?;
        let id = PromptId::from_string(&id_str).map_err(Self::invalid_column(0, "Invalid UUID"))?;

        let habit_id_str: String = row.get(1)?;
        let habit_id =
            HabitId::from_string(&habit_id_str).map_err(Self::invalid_column(1, "Invalid UUID"))?;

        let lines_json: String = row.get(2)?;
        let lines =
            serde_json::from_str(&lines_json).map_err(Self::invalid_column(2, "Invalid prompt lines"))?;

        Ok(Prompt { id, habit_id, lines })
    }

    fn insert_habit(conn: &Connection, habit: &Habit) -> Result<(), StorageError> {
        let frequency_json = serde_json::to_string(&habit.frequency)?;

        conn.execute(
            "INSERT OR REPLACE INTO habits (
                id, title, icon, habit_type, unit, target, category, frequency,
                active, created_at, archived
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                habit.id.to_string(),
                habit.title,
                habit.icon,
                habit.habit_type.as_str(),
                habit.unit,
                habit.target,
                habit.category.as_str(),
                frequency_json,
                habit.active,
                habit.created_at.to_rfc3339(),
                habit.archived
            ],
        )?;

        Ok(())
    }

    fn insert_entry(conn: &Connection, entry: &Entry) -> Result<(), StorageError> {
        conn.execute(
            "INSERT INTO entries (id, habit_id, date, amount, memo, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.id.to_string(),
                entry.habit_id.to_string(),
                dates::iso(entry.date),
                entry.amount,
                entry.memo,
                entry.created_at.to_rfc3339()
            ],
        )?;

        Ok(())
    }

    fn insert_prompt(conn: &Connection, prompt: &Prompt) -> Result<(), StorageError> {
        let lines_json = serde_json::to_string(&prompt.lines)?;

        conn.execute(
            "INSERT OR REPLACE INTO prompts (id, habit_id, lines) VALUES (?1, ?2, ?3)",
            params![prompt.id.to_string(), prompt.habit_id.to_string(), lines_json],
        )?;

        Ok(())
    }

    /// The entry id for (habit, date), if one exists
    fn entry_id_for(
        conn: &Connection,
        habit_id: &HabitId,
        date: NaiveDate,
    ) -> Result<Option<String>, StorageError> {
        let id = conn
            .query_row(
                "SELECT id FROM entries WHERE habit_id = ?1 AND date = ?2",
                params![habit_id.to_string(), dates::iso(date)],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(id)
    }
}

impl HabitStore for SqliteStore {
    /// Insert or fully replace a habit record by identifier
    fn upsert_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        Self::insert_habit(&self.conn, habit)?;

        tracing::debug!("Upserted habit: {} ({})", habit.title, habit.id.to_string());
        Ok(())
    }

    /// Get a habit by its ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, icon, habit_type, unit, target, category, frequency,
                    active, created_at, archived
             FROM habits WHERE id = ?1",
        )?;

        let result = stmt.query_row(params![habit_id.to_string()], Self::habit_from_row);

        match result {
            Ok(habit) => Ok(habit),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            }),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// List every habit, active or not
    fn list_all_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, icon, habit_type, unit, target, category, frequency,
                    active, created_at, archived
             FROM habits ORDER BY created_at DESC",
        )?;

        let habit_iter = stmt.query_map([], Self::habit_from_row)?;

        let mut habits = Vec::new();
        for habit in habit_iter {
            habits.push(habit?);
        }

        Ok(habits)
    }

    /// Toggle a binary habit for the given day
    fn log_binary_on(&self, habit_id: &HabitId, date: NaiveDate) -> Result<LogOutcome, StorageError> {
        let tx = self.conn.unchecked_transaction()?;

        let outcome = match Self::entry_id_for(&tx, habit_id, date)? {
            Some(entry_id) => {
                tx.execute("DELETE FROM entries WHERE id = ?1", params![entry_id])?;
                LogOutcome::Removed
            }
            None => {
                let entry = Entry::new(habit_id.clone(), date, None, None);
                Self::insert_entry(&tx, &entry)?;
                LogOutcome::Added
            }
        };

        tx.commit()?;

        tracing::debug!(
            "Toggled habit {} on {}: {:?}",
            habit_id.to_string(),
            dates::iso(date),
            outcome
        );
        Ok(outcome)
    }

    /// Record an amount for the given day, overwriting in place
    fn log_amount_on(
        &self,
        habit_id: &HabitId,
        date: NaiveDate,
        amount: f64,
        memo: Option<&str>,
    ) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;

        match Self::entry_id_for(&tx, habit_id, date)? {
            Some(entry_id) => {
                tx.execute(
                    "UPDATE entries SET amount = ?2, memo = ?3 WHERE id = ?1",
                    params![entry_id, amount, memo],
                )?;
            }
            None => {
                let entry = Entry::new(
                    habit_id.clone(),
                    date,
                    Some(amount),
                    memo.map(str::to_string),
                );
                Self::insert_entry(&tx, &entry)?;
            }
        }

        tx.commit()?;

        tracing::debug!(
            "Logged amount {} for habit {} on {}",
            amount,
            habit_id.to_string(),
            dates::iso(date)
        );
        Ok(())
    }

    /// Entries matching (habit, date) - zero or one by invariant
    fn entries_for(&self, habit_id: &HabitId, date: NaiveDate) -> Result<Vec<Entry>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, date, amount, memo, created_at
             FROM entries WHERE habit_id = ?1 AND date = ?2",
        )?;

        let entry_iter = stmt.query_map(
            params![habit_id.to_string(), dates::iso(date)],
            Self::entry_from_row,
        )?;

        let mut entries = Vec::new();
        for entry in entry_iter {
            entries.push(entry?);
        }

        Ok(entries)
    }

    /// All entries for a calendar day across habits
    fn entries_on(&self, date: NaiveDate) -> Result<Vec<Entry>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, date, amount, memo, created_at
             FROM entries WHERE date = ?1 ORDER BY created_at",
        )?;

        let entry_iter = stmt.query_map(params![dates::iso(date)], Self::entry_from_row)?;

        let mut entries = Vec::new();
        for entry in entry_iter {
            entries.push(entry?);
        }

        Ok(entries)
    }

    /// Seed the starter habit plan if the habit collection is empty
    fn seed_if_empty(&self) -> Result<bool, StorageError> {
        let tx = self.conn.unchecked_transaction()?;

        let count: i64 = tx.query_row("SELECT COUNT(*) FROM habits", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(false);
        }

        let (habits, prompts) = seed::starter_plan();
        for habit in &habits {
            Self::insert_habit(&tx, habit)?;
        }
        for prompt in &prompts {
            Self::insert_prompt(&tx, prompt)?;
        }

        tx.commit()?;

        tracing::info!(
            "Seeded starter plan: {} habits, {} prompts",
            habits.len(),
            prompts.len()
        );
        Ok(true)
    }

    /// Insert or replace a reminder by identifier
    fn upsert_reminder(&self, reminder: &Reminder) -> Result<(), StorageError> {
        let (lat, lng, radius_m) = match &reminder.location {
            Some(g) => (Some(g.lat), Some(g.lng), Some(g.radius_m)),
            None => (None, None, None),
        };

        self.conn.execute(
            "INSERT OR REPLACE INTO reminders (
                id, habit_id, kind, time, lat, lng, radius_m, enabled, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                reminder.id.to_string(),
                reminder.habit_id.to_string(),
                reminder.kind.as_str(),
                reminder.time,
                lat,
                lng,
                radius_m,
                reminder.enabled,
                reminder.created_at.to_rfc3339()
            ],
        )?;

        tracing::debug!("Upserted reminder: {}", reminder.id.to_string());
        Ok(())
    }

    /// List reminders, optionally scoped to one habit
    fn list_reminders(&self, habit_id: Option<&HabitId>) -> Result<Vec<Reminder>, StorageError> {
        let mut reminders = Vec::new();

        match habit_id {
            Some(habit_id) => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, habit_id, kind, time, lat, lng, radius_m, enabled, created_at
                     FROM reminders WHERE habit_id = ?1 ORDER BY created_at",
                )?;
                let iter = stmt.query_map(params![habit_id.to_string()], Self::reminder_from_row)?;
                for reminder in iter {
                    reminders.push(reminder?);
                }
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, habit_id, kind, time, lat, lng, radius_m, enabled, created_at
                     FROM reminders ORDER BY created_at",
                )?;
                let iter = stmt.query_map([], Self::reminder_from_row)?;
                for reminder in iter {
                    reminders.push(reminder?);
                }
            }
        }

        Ok(reminders)
    }

    /// The prompt attached to a habit, if any
    fn prompt_for_habit(&self, habit_id: &HabitId) -> Result<Option<Prompt>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, lines FROM prompts WHERE habit_id = ?1 LIMIT 1",
        )?;

        let prompt = stmt
            .query_row(params![habit_id.to_string()], Self::prompt_from_row)
            .optional()?;

        Ok(prompt)
    }

    /// All prompts in the store
    fn list_prompts(&self) -> Result<Vec<Prompt>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT id, habit_id, lines FROM prompts")?;

        let prompt_iter = stmt.query_map([], Self::prompt_from_row)?;

        let mut prompts = Vec::new();
        for prompt in prompt_iter {
            prompts.push(prompt?);
        }

        Ok(prompts)
    }
}
