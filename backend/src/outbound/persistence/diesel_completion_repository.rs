//! PostgreSQL-backed day ledger.
//!
//! `days` holds one row per calendar date that has seen a toggle and
//! `day_habits` one row per completion. The unique `(day_id, habit_id)`
//! constraint turns a racing double insert into a conflict the caller may
//! retry.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::dsl::count;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{CompletionRepository, CompletionRepositoryError};
use crate::domain::{DayCompletionCount, HabitId, UserId};

use super::diesel_basic_error_mapping::{map_basic_pool_error, map_unique_diesel_error};
use super::models::{NewDayHabitRow, NewDayRow};
use super::pool::{DbPool, PoolError};
use super::schema::{day_habits, days, habits};

/// Diesel-backed implementation of the completion repository port.
#[derive(Clone)]
pub struct DieselCompletionRepository {
    pool: DbPool,
}

impl DieselCompletionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CompletionRepositoryError {
    map_basic_pool_error(error, CompletionRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CompletionRepositoryError {
    map_unique_diesel_error(
        error,
        CompletionRepositoryError::query,
        CompletionRepositoryError::connection,
        CompletionRepositoryError::conflict,
    )
}

fn to_count(date: NaiveDate, completed: i64) -> Result<DayCompletionCount, CompletionRepositoryError> {
    let completed = u64::try_from(completed).map_err(|_| {
        CompletionRepositoryError::query(format!("negative completion count on {date}"))
    })?;
    Ok(DayCompletionCount { date, completed })
}

#[async_trait]
impl CompletionRepository for DieselCompletionRepository {
    async fn toggle(
        &self,
        habit: &HabitId,
        date: NaiveDate,
    ) -> Result<bool, CompletionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let habit_id = *habit.as_uuid();
        let new_day = NewDayRow {
            id: Uuid::new_v4(),
            date,
        };

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(days::table)
                    .values(&new_day)
                    .on_conflict(days::date)
                    .do_nothing()
                    .execute(conn)
                    .await?;
                let day_id: Uuid = days::table
                    .filter(days::date.eq(date))
                    .select(days::id)
                    .first(conn)
                    .await?;

                let removed = diesel::delete(
                    day_habits::table
                        .filter(day_habits::day_id.eq(day_id))
                        .filter(day_habits::habit_id.eq(habit_id)),
                )
                .execute(conn)
                .await?;
                if removed > 0 {
                    return Ok(false);
                }

                diesel::insert_into(day_habits::table)
                    .values(&NewDayHabitRow {
                        id: Uuid::new_v4(),
                        day_id,
                        habit_id,
                    })
                    .execute(conn)
                    .await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn completed_on(
        &self,
        owner: &UserId,
        date: NaiveDate,
    ) -> Result<Vec<HabitId>, CompletionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let ids: Vec<Uuid> = day_habits::table
            .inner_join(days::table)
            .inner_join(habits::table)
            .filter(days::date.eq(date))
            .filter(habits::user_id.eq(owner.as_uuid()))
            .order(day_habits::habit_id.asc())
            .select(day_habits::habit_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(ids.into_iter().map(HabitId::from_uuid).collect())
    }

    async fn completion_counts(
        &self,
        owner: &UserId,
    ) -> Result<Vec<DayCompletionCount>, CompletionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(NaiveDate, i64)> = day_habits::table
            .inner_join(days::table)
            .inner_join(habits::table)
            .filter(habits::user_id.eq(owner.as_uuid()))
            .group_by(days::date)
            .order(days::date.asc())
            .select((days::date, count(day_habits::id)))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(date, completed)| to_count(date, completed))
            .collect()
    }
}
