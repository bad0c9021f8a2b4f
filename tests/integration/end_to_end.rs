/// End-to-end flows against a real database file
use tempfile::NamedTempFile;

use mnemo::domain::{dates, HabitType};
use mnemo::history::{average_pct, seven_day_history};
use mnemo::storage::{HabitStore, LogOutcome, SqliteStore};

#[test]
fn boot_seed_toggle_history_flow() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let store = SqliteStore::new(temp_file.path().to_path_buf()).expect("Failed to create store");

    // First boot seeds; second boot is a no-op
    assert!(store.seed_if_empty().unwrap());
    assert!(!store.seed_if_empty().unwrap());

    let active = store.list_active_habits().unwrap();
    assert!(!active.is_empty());

    // Toggle every active binary habit for today
    let binaries: Vec<_> = active
        .iter()
        .filter(|h| h.habit_type == HabitType::Binary)
        .collect();
    assert!(!binaries.is_empty());

    for habit in &binaries {
        assert_eq!(store.log_binary(&habit.id).unwrap(), LogOutcome::Added);
    }

    // Log an amount habit too
    if let Some(counter) = active.iter().find(|h| h.habit_type == HabitType::Counter) {
        store.log_amount(&counter.id, 3.0, Some("steady")).unwrap();
        let entries = store.entries_for(&counter.id, dates::today_local()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].amount, Some(3.0));
    }

    // History reflects today's completions on the last bar
    let stats = seven_day_history(&store).unwrap();
    assert_eq!(stats.len(), 7);

    let today_stat = stats.last().unwrap();
    assert_eq!(today_stat.date, dates::today_local());
    assert_eq!(today_stat.total, active.len());
    assert!(today_stat.done >= binaries.len());
    assert!(today_stat.pct > 0);
    assert!(average_pct(&stats) > 0);
}

#[test]
fn store_persists_across_reopen() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_file.path().to_path_buf();

    let toggled_id = {
        let store = SqliteStore::new(db_path.clone()).expect("Failed to create store");
        store.seed_if_empty().unwrap();

        let habit = store
            .list_active_habits()
            .unwrap()
            .into_iter()
            .find(|h| h.habit_type == HabitType::Binary)
            .expect("seed plan has binary habits");
        store.log_binary(&habit.id).unwrap();
        habit.id
    };

    // A second store over the same file sees everything
    let store = SqliteStore::new(db_path).expect("Failed to reopen store");
    assert!(!store.seed_if_empty().unwrap());

    let entries = store.entries_for(&toggled_id, dates::today_local()).unwrap();
    assert_eq!(entries.len(), 1);

    // And the toggle still alternates
    assert_eq!(store.log_binary(&toggled_id).unwrap(), LogOutcome::Removed);
    assert!(store.entries_for(&toggled_id, dates::today_local()).unwrap().is_empty());
}

#[test]
fn inactive_habits_stay_out_of_today_but_keep_history() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let store = SqliteStore::new(temp_file.path().to_path_buf()).expect("Failed to create store");
    store.seed_if_empty().unwrap();

    let mut habit = store
        .list_active_habits()
        .unwrap()
        .into_iter()
        .find(|h| h.habit_type == HabitType::Binary)
        .expect("seed plan has binary habits");

    store.log_binary(&habit.id).unwrap();

    // Soft-deactivate via full-record upsert
    habit.deactivate();
    store.upsert_habit(&habit).unwrap();

    assert!(store
        .list_active_habits()
        .unwrap()
        .iter()
        .all(|h| h.id != habit.id));

    // Entry history is retained
    let entries = store.entries_for(&habit.id, dates::today_local()).unwrap();
    assert_eq!(entries.len(), 1);

    // And the deactivated habit no longer counts toward today's totals
    let stats = seven_day_history(&store).unwrap();
    let today_stat = stats.last().unwrap();
    assert_eq!(today_stat.done, 0);
}
