/// 7-day completion history
///
/// For each of the last seven local days, counts how many active habits have
/// an entry that day. Habits are filtered on the `active` flag client-side
/// after a full read, so inactive habits stay out of the denominator without
/// any indexed boolean encoding.

use std::collections::HashSet;

use crate::domain::{dates, HabitId};
use crate::storage::{HabitStore, StorageError};

/// Completion stats for one calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct DayStat {
    /// The local calendar day
    pub date: chrono::NaiveDate,
    /// Active habits with an entry that day
    pub done: usize,
    /// Total active habits
    pub total: usize,
    /// done / total as a rounded percentage, 0 when no habits exist
    pub pct: u32,
}

impl DayStat {
    /// Short weekday label for display, e.g. "Mon"
    pub fn label(&self) -> String {
        dates::short_label(self.date)
    }
}

/// Completion stats for the last seven local days, oldest first
pub fn seven_day_history<S: HabitStore>(store: &S) -> Result<Vec<DayStat>, StorageError> {
    history(store, 7)
}

/// Completion stats for the last `days` local days, oldest first
pub fn history<S: HabitStore>(store: &S, days: u32) -> Result<Vec<DayStat>, StorageError> {
    let active: HashSet<HabitId> = store
        .list_active_habits()?
        .into_iter()
        .map(|h| h.id)
        .collect();
    let total = active.len();

    let mut stats = Vec::with_capacity(days as usize);
    for date in dates::last_n_days(days) {
        let entries = store.entries_on(date)?;
        let done: HashSet<&HabitId> = entries
            .iter()
            .map(|e| &e.habit_id)
            .filter(|id| active.contains(id))
            .collect();
        let done = done.len();

        let pct = if total > 0 {
            ((done as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };

        stats.push(DayStat { date, done, total, pct });
    }

    Ok(stats)
}

/// Average completion percentage across a window of day stats
pub fn average_pct(stats: &[DayStat]) -> u32 {
    if stats.is_empty() {
        return 0;
    }
    let sum: u32 = stats.iter().map(|s| s.pct).sum();
    ((sum as f64) / (stats.len() as f64)).round() as u32
}
