//! Port for the day ledger: per-date completion records.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{DayCompletionCount, HabitId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by completion repository adapters.
    pub enum CompletionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "completion repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "completion repository query failed: {message}",
        /// A concurrent toggle for the same habit and date won the race.
        Conflict { message: String } => "completion repository conflict: {message}",
    }
}

/// Port for flipping and reading habit completions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionRepository: Send + Sync {
    /// Flip the completion of `habit` on `date` in one transaction, creating
    /// the day row on first use. Returns whether the habit is now completed.
    async fn toggle(
        &self,
        habit: &HabitId,
        date: NaiveDate,
    ) -> Result<bool, CompletionRepositoryError>;

    /// Ids of `owner`'s habits completed on `date`.
    async fn completed_on(
        &self,
        owner: &UserId,
        date: NaiveDate,
    ) -> Result<Vec<HabitId>, CompletionRepositoryError>;

    /// Per-date completion counts for `owner`, only for dates with at least
    /// one completion.
    async fn completion_counts(
        &self,
        owner: &UserId,
    ) -> Result<Vec<DayCompletionCount>, CompletionRepositoryError>;
}
