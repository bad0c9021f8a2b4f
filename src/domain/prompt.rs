/// Prompt entity for guided logging
///
/// A prompt is a short set of reflection lines shown when its habit is
/// toggled. In practice at most one prompt exists per habit, but this is
/// not enforced as a hard constraint.

use serde::{Deserialize, Serialize};
use crate::domain::{HabitId, PromptId};

/// Guided reflection lines attached to a habit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    /// Unique identifier for this prompt
    pub id: PromptId,
    /// Which habit this prompt belongs to
    pub habit_id: HabitId,
    /// Bullet lines shown when logging
    pub lines: Vec<String>,
}

impl Prompt {
    /// Create a new prompt for the given habit
    pub fn new(habit_id: HabitId, lines: Vec<String>) -> Self {
        Self {
            id: PromptId::new(),
            habit_id,
            lines,
        }
    }
}
