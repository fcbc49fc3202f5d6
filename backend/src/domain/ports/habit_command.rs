//! Driving port for habit mutations.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Error, Habit, HabitId, NewHabit, UserId};

/// New completion state returned by a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub habit_id: HabitId,
    pub date: NaiveDate,
    pub completed: bool,
}

/// Domain use-case port for creating habits and toggling completions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HabitCommand: Send + Sync {
    /// Create a habit owned by `owner`, dated today.
    async fn create_habit(&self, owner: &UserId, habit: NewHabit) -> Result<Habit, Error>;

    /// Flip today's completion of `habit`; `owner` must own it.
    async fn toggle_habit(&self, owner: &UserId, habit: &HabitId) -> Result<ToggleOutcome, Error>;
}
