//! Driving port for habit read models.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{DaySummary, DayView, Error, UserId};

/// Domain use-case port for the day view and completion summary.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HabitQuery: Send + Sync {
    /// Habits possible and completed on `date`.
    async fn day_view(&self, owner: &UserId, date: NaiveDate) -> Result<DayView, Error>;

    /// Per-day summary for every date with at least one completion.
    async fn summary(&self, owner: &UserId) -> Result<Vec<DaySummary>, Error>;
}
