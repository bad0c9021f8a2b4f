/// Starter habit plan seeded on first boot
///
/// The plan covers the memory-training program: alcohol management, sleep
/// stabilization, daily primers, professional practice, supplements,
/// fitness, structured brain training, and reflection. Four habits carry
/// guided-logging prompts.

use chrono::Utc;
use crate::domain::{Category, Frequency, Habit, HabitId, HabitType, Prompt};

fn habit(
    title: &str,
    icon: &str,
    habit_type: HabitType,
    unit: Option<&str>,
    target: Option<u32>,
    category: Category,
    frequency: Frequency,
) -> Habit {
    Habit {
        id: HabitId::new(),
        title: title.to_string(),
        icon: Some(icon.to_string()),
        habit_type,
        unit: unit.map(str::to_string),
        target,
        category,
        frequency,
        active: true,
        created_at: Utc::now(),
        archived: false,
    }
}

fn daily() -> Frequency {
    Frequency::Daily
}

fn custom(note: Option<&str>) -> Frequency {
    Frequency::Custom {
        note: note.map(str::to_string),
    }
}

/// Build the starter habits and their prompts
///
/// IDs and timestamps are freshly generated per call; the caller inserts
/// both collections in one transaction.
pub fn starter_plan() -> (Vec<Habit>, Vec<Prompt>) {
    use Category::*;
    use HabitType::*;

    let mut habits = vec![
        // Alcohol management
        habit("Cap <=4 drinks", "🍺", Binary, None, None, Alcohol, custom(Some("Only on drinking nights"))),
        habit("Water after each drink", "🚰", Counter, Some("glasses"), Some(4), Alcohol, custom(None)),
        habit("Front-load social time", "🕒", Binary, None, None, Alcohol, custom(None)),
        // Sleep stabilization
        habit("Magnesium glycinate 400mg", "💊", Binary, None, None, Sleep, daily()),
        habit("Blue-light cut 60m pre-bed", "📵", Binary, None, None, Sleep, daily()),
        habit("Consistent sleep/wake", "⏰", Binary, None, None, Sleep, daily()),
        // Daily memory primers
        habit("Yesterday recall (3 items)", "📝", Binary, None, None, Primers, daily()),
        habit("Mental math burst (10)", "➗", Counter, Some("problems"), Some(10), Primers, daily()),
        habit("Name & image link", "🎯", Binary, None, None, Primers, custom(Some("When meeting someone new"))),
        // Pro / AI
        habit("Code tracing (5-10m)", "💻", Duration, Some("min"), Some(10), ProAI, daily()),
        habit("Mini-AI explainer (2-3 sent.)", "🤖", Binary, None, None, ProAI, daily()),
        // Supplements
        habit("Omega-3 (1-2g)", "🧠", Binary, None, None, Supplements, daily()),
        habit("B-complex", "🧪", Binary, None, None, Supplements, daily()),
        // Fitness and blood flow
        habit("Cardio (20-30m)", "🏃", Duration, Some("min"), Some(30), Fitness, custom(Some("4-5x/week"))),
        // Structured brain training
        habit("Dual N-back", "🧩", Binary, None, None, NBack, custom(Some("3x/week"))),
        habit("Memory palace list", "🏛️", Binary, None, None, MemoryPalace, custom(Some("2x/week"))),
        // Social memory overlap
        habit("Remember 2 names + facts", "🗣️", Binary, None, None, Social, custom(Some("On social nights"))),
        // Weekly reflection, Sunday
        habit("Weekly reflection (3 prompts)", "📒", Binary, None, None, Reflection, Frequency::Weekly { days_of_week: vec![7] }),
        // Long-term reset, parked until scheduled
        habit("Alcohol-free 2 weeks", "🛑", Binary, None, None, LongTerm, custom(Some("Every 3 months"))),
    ];

    if let Some(reset) = habits.last_mut() {
        reset.active = false;
    }

    let prompt_for = |habits: &[Habit], title: &str, lines: &[&str]| -> Option<Prompt> {
        habits
            .iter()
            .find(|h| h.title == title)
            .map(|h| Prompt::new(h.id.clone(), lines.iter().map(|l| l.to_string()).collect()))
    };

    let prompts = [
        prompt_for(&habits, "Yesterday recall (3 items)", &[
            "What did you wear?",
            "What did you eat/drink?",
            "One conversation detail?",
        ]),
        prompt_for(&habits, "Mini-AI explainer (2-3 sent.)", &[
            "Pick a concept (e.g., overfitting, embeddings, gradient descent).",
            "Explain in 2-3 sentences as if to a junior dev.",
        ]),
        prompt_for(&habits, "Weekly reflection (3 prompts)", &[
            "Best recall moment this week.",
            "Worst memory miss.",
            "One change to try next week.",
        ]),
        prompt_for(&habits, "Name & image link", &[
            "Repeat their name out loud.",
            "Link it to a mental image (mnemonic).",
            "Recall it later today.",
        ]),
    ]
    .into_iter()
    .flatten()
    .collect();

    (habits, prompts)
}
