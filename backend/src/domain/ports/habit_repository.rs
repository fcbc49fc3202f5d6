//! Port for habit persistence and schedule reads.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Habit, HabitId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by habit repository adapters.
    pub enum HabitRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "habit repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "habit repository query failed: {message}",
    }
}

/// Port for writing habits and reading them back by schedule.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HabitRepository: Send + Sync {
    /// Store a habit and one recurrence row per weekday atomically.
    async fn create(&self, habit: &Habit) -> Result<(), HabitRepositoryError>;

    /// Find a habit by id, regardless of owner.
    async fn find_by_id(&self, id: &HabitId) -> Result<Option<Habit>, HabitRepositoryError>;

    /// Habits owned by `owner` that are possible on `date`, each once.
    async fn list_possible_on(
        &self,
        owner: &UserId,
        date: NaiveDate,
    ) -> Result<Vec<Habit>, HabitRepositoryError>;

    /// Every habit owned by `owner`.
    async fn list_for_user(&self, owner: &UserId) -> Result<Vec<Habit>, HabitRepositoryError>;
}
