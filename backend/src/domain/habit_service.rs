//! Habit domain services.
//!
//! Implements the habit command and query driving ports on top of the habit
//! and completion repositories. "Today" is the server's local calendar date.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    CompletionRepository, CompletionRepositoryError, HabitCommand, HabitQuery, HabitRepository,
    HabitRepositoryError, ToggleOutcome,
};
use crate::domain::{
    DaySummary, DayView, Error, Habit, HabitDraft, HabitId, NewHabit, UserId, summarise,
};

fn map_habit_error(error: HabitRepositoryError) -> Error {
    match error {
        HabitRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("habit repository unavailable: {message}"))
        }
        HabitRepositoryError::Query { message } => {
            Error::internal(format!("habit repository error: {message}"))
        }
    }
}

fn map_completion_error(error: CompletionRepositoryError) -> Error {
    match error {
        CompletionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("completion repository unavailable: {message}"))
        }
        CompletionRepositoryError::Query { message } => {
            Error::internal(format!("completion repository error: {message}"))
        }
        CompletionRepositoryError::Conflict { message } => {
            Error::conflict(format!("concurrent toggle, retry: {message}"))
        }
    }
}

/// Habit service implementing the command and query driving ports.
#[derive(Clone)]
pub struct HabitService<H, C> {
    habits: Arc<H>,
    completions: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<H, C> HabitService<H, C> {
    pub fn new(habits: Arc<H>, completions: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            habits,
            completions,
            clock,
        }
    }

    fn today(&self) -> NaiveDate {
        self.clock.local().date_naive()
    }
}

#[async_trait]
impl<H, C> HabitCommand for HabitService<H, C>
where
    H: HabitRepository,
    C: CompletionRepository,
{
    async fn create_habit(&self, owner: &UserId, habit: NewHabit) -> Result<Habit, Error> {
        let NewHabit { title, week_days } = habit;
        let habit = Habit::new(HabitDraft {
            id: HabitId::random(),
            owner: *owner,
            title,
            created_on: self.today(),
            created_at: self.clock.utc(),
            week_days,
        });

        self.habits.create(&habit).await.map_err(map_habit_error)?;
        info!(habit_id = %habit.id(), user_id = %owner, "created habit");
        Ok(habit)
    }

    async fn toggle_habit(&self, owner: &UserId, habit: &HabitId) -> Result<ToggleOutcome, Error> {
        let stored = self
            .habits
            .find_by_id(habit)
            .await
            .map_err(map_habit_error)?
            .ok_or_else(|| Error::not_found(format!("habit {habit} not found")))?;
        if !stored.is_owned_by(owner) {
            return Err(Error::forbidden(format!("habit {habit} belongs to another user")));
        }

        let date = self.today();
        let completed = self
            .completions
            .toggle(habit, date)
            .await
            .map_err(map_completion_error)?;
        debug!(habit_id = %habit, %date, completed, "toggled habit");

        Ok(ToggleOutcome {
            habit_id: *habit,
            date,
            completed,
        })
    }
}

#[async_trait]
impl<H, C> HabitQuery for HabitService<H, C>
where
    H: HabitRepository,
    C: CompletionRepository,
{
    async fn day_view(&self, owner: &UserId, date: NaiveDate) -> Result<DayView, Error> {
        let possible = self
            .habits
            .list_possible_on(owner, date)
            .await
            .map_err(map_habit_error)?;
        let completed = self
            .completions
            .completed_on(owner, date)
            .await
            .map_err(map_completion_error)?;
        Ok(DayView {
            possible,
            completed,
        })
    }

    async fn summary(&self, owner: &UserId) -> Result<Vec<DaySummary>, Error> {
        let counts = self
            .completions
            .completion_counts(owner)
            .await
            .map_err(map_completion_error)?;
        if counts.is_empty() {
            return Ok(Vec::new());
        }
        let habits = self
            .habits
            .list_for_user(owner)
            .await
            .map_err(map_habit_error)?;
        Ok(summarise(&habits, &counts))
    }
}

#[cfg(test)]
#[path = "habit_service_tests.rs"]
mod tests;
