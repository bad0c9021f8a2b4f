/// Command-line front end for the Mnemo habit tracker core
///
/// Thin glue over the local store: seed, list today's habits, toggle or log
/// amounts, and show the 7-day history. All state lives in the SQLite store.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use mnemo::domain::{dates, Category, HabitId, HabitType};
use mnemo::history::{average_pct, seven_day_history};
use mnemo::storage::{HabitStore, LogOutcome, SqliteStore};
use mnemo::AppError;

/// Get the default database path with robust fallback strategy
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    // Try various locations in order of preference
    let potential_paths = [
        // 1. User's home directory (preferred)
        dirs::home_dir().map(|mut p| {
            p.push(".mnemo");
            p
        }),
        // 2. User's data directory (platform-specific)
        dirs::data_dir().map(|mut p| {
            p.push("mnemo");
            p
        }),
        // 3. User's config directory
        dirs::config_dir().map(|mut p| {
            p.push("mnemo");
            p
        }),
        // 4. Current working directory (last resort)
        std::env::current_dir().ok().map(|mut p| {
            p.push(".mnemo");
            p
        }),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if let Ok(()) = std::fs::create_dir_all(potential_path) {
            // Test if we can write to this directory
            let test_file = potential_path.join(".test_write");
            if std::fs::write(&test_file, "test").is_ok() {
                let _ = std::fs::remove_file(&test_file);
                let mut db_path = potential_path.clone();
                db_path.push("mnemo.db");
                return Ok(db_path);
            }
        }
    }

    // Ultimate fallback: use a temporary directory
    let mut temp_path = std::env::temp_dir();
    temp_path.push("mnemo");
    std::fs::create_dir_all(&temp_path)?;
    temp_path.push("mnemo.db");

    tracing::warn!("Using temporary directory for database: {}", temp_path.display());
    Ok(temp_path)
}

/// Command line arguments for Mnemo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Insert the starter habit plan if the store is empty
    Seed,
    /// Show today's active habits grouped by category
    List,
    /// Toggle a binary habit for today
    Toggle {
        /// Habit identifier (UUID)
        habit_id: String,
    },
    /// Record an amount for a habit today, overwriting any earlier log
    Log {
        /// Habit identifier (UUID)
        habit_id: String,
        /// Amount in the habit's unit
        amount: f64,
        /// Optional memo for the day
        #[arg(long)]
        memo: Option<String>,
    },
    /// Show completion history for the last 7 days
    History,
}

const CATEGORY_ORDER: [Category; 11] = [
    Category::Alcohol,
    Category::Sleep,
    Category::Primers,
    Category::ProAI,
    Category::Supplements,
    Category::Fitness,
    Category::NBack,
    Category::MemoryPalace,
    Category::Social,
    Category::Reflection,
    Category::LongTerm,
];

fn parse_habit_id(s: &str) -> Result<HabitId, Box<dyn std::error::Error>> {
    Ok(HabitId::from_string(s).map_err(|e| format!("Invalid habit id '{}': {}", s, e))?)
}

fn cmd_list(store: &SqliteStore) -> Result<(), AppError> {
    let habits = store.list_active_habits()?;
    let today = dates::today_local();
    let entries = store.entries_on(today)?;

    let done: std::collections::HashSet<&HabitId> = entries.iter().map(|e| &e.habit_id).collect();
    let completed = habits.iter().filter(|h| done.contains(&h.id)).count();

    println!("Today {} - {}/{} done", dates::iso(today), completed, habits.len());

    for category in CATEGORY_ORDER {
        let group: Vec<_> = habits.iter().filter(|h| h.category == category).collect();
        if group.is_empty() {
            continue;
        }

        println!("\n{}", category.display_name());
        for habit in group {
            let mark = if done.contains(&habit.id) { "x" } else { " " };
            let icon = habit.icon.as_deref().unwrap_or("");
            let target = habit
                .target_display()
                .map(|t| format!(" ({})", t))
                .unwrap_or_default();
            println!("  [{}] {} {}{}  {}", mark, icon, habit.title, target, habit.id.to_string());
        }
    }

    Ok(())
}

fn cmd_toggle(store: &SqliteStore, habit_id: &HabitId) -> Result<(), AppError> {
    let habit = store.get_habit(habit_id)?;

    if habit.habit_type != HabitType::Binary {
        println!(
            "'{}' is a {} habit - use `log` with an amount instead.",
            habit.title,
            habit.habit_type.as_str()
        );
        return Ok(());
    }

    // Guided-logging prompt, when one is attached
    if let Some(prompt) = store.prompt_for_habit(habit_id)? {
        println!("{}:", habit.title);
        for line in &prompt.lines {
            println!("  - {}", line);
        }
    }

    match store.log_binary(habit_id)? {
        LogOutcome::Added => println!("Done: {}", habit.title),
        LogOutcome::Removed => println!("Cleared: {}", habit.title),
    }

    Ok(())
}

fn cmd_log(store: &SqliteStore, habit_id: &HabitId, amount: f64, memo: Option<&str>) -> Result<(), AppError> {
    let habit = store.get_habit(habit_id)?;
    store.log_amount(habit_id, amount, memo)?;

    let unit = habit.unit.as_deref().unwrap_or("");
    println!("Logged {} {} for {}", amount, unit, habit.title);
    Ok(())
}

fn cmd_history(store: &SqliteStore) -> Result<(), AppError> {
    let stats = seven_day_history(store)?;

    println!("Last 7 days");
    for stat in &stats {
        let bar_len = (stat.pct / 5) as usize;
        println!(
            "  {} {:>3}%  {}  ({}/{})",
            stat.label(),
            stat.pct,
            "#".repeat(bar_len),
            stat.done,
            stat.total
        );
    }
    println!("Average completion: {}%", average_pct(&stats));
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("mnemo={}", log_level))
        .with_writer(std::io::stderr) // Keep stdout for command output
        .init();

    // Determine database path
    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => get_default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let store = SqliteStore::new(db_path)?;

    match args.command {
        Command::Seed => {
            if store.seed_if_empty()? {
                println!("Seeded the starter habit plan.");
            } else {
                println!("Store already has habits; nothing to do.");
            }
        }
        Command::List => cmd_list(&store)?,
        Command::Toggle { habit_id } => {
            let habit_id = parse_habit_id(&habit_id)?;
            cmd_toggle(&store, &habit_id)?;
        }
        Command::Log { habit_id, amount, memo } => {
            let habit_id = parse_habit_id(&habit_id)?;
            cmd_log(&store, &habit_id, amount, memo.as_deref())?;
        }
        Command::History => cmd_history(&store)?,
    }

    Ok(())
}
