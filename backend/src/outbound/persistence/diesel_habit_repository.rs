//! PostgreSQL-backed `HabitRepository` implementation using Diesel ORM.
//!
//! A habit is one `habits` row plus one `habit_week_days` row per supplied
//! weekday; both are written in a single transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{HabitRepository, HabitRepositoryError};
use crate::domain::{Habit, HabitDraft, HabitId, HabitTitle, UserId, WeekDay};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{HabitRow, HabitWeekDayRow, NewHabitRow, NewHabitWeekDayRow};
use super::pool::{DbPool, PoolError};
use super::schema::{habit_week_days, habits};

/// Diesel-backed implementation of the habit repository port.
#[derive(Clone)]
pub struct DieselHabitRepository {
    pool: DbPool,
}

impl DieselHabitRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> HabitRepositoryError {
    map_basic_pool_error(error, HabitRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> HabitRepositoryError {
    map_basic_diesel_error(
        error,
        HabitRepositoryError::query,
        HabitRepositoryError::connection,
    )
}

fn week_day_rows(habit: &Habit) -> Vec<NewHabitWeekDayRow> {
    habit
        .week_days()
        .iter()
        .map(|day| NewHabitWeekDayRow {
            id: Uuid::new_v4(),
            habit_id: *habit.id().as_uuid(),
            week_day: i16::from(day.number()),
        })
        .collect()
}

fn row_to_habit(row: HabitRow, week_days: Vec<i16>) -> Result<Habit, HabitRepositoryError> {
    let HabitRow {
        id,
        user_id,
        title,
        created_on,
        created_at,
    } = row;
    let title = HabitTitle::new(title)
        .map_err(|err| HabitRepositoryError::query(format!("stored habit {id}: {err}")))?;
    let week_days = week_days
        .into_iter()
        .map(|value| WeekDay::try_from(i64::from(value)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| HabitRepositoryError::query(format!("stored habit {id}: {err}")))?;

    Ok(Habit::new(HabitDraft {
        id: HabitId::from_uuid(id),
        owner: UserId::from_uuid(user_id),
        title,
        created_on,
        created_at,
        week_days,
    }))
}

/// Attach recurrence rows to their habits, preserving the order of `rows`.
fn assemble_habits(
    rows: Vec<HabitRow>,
    week_day_rows: Vec<HabitWeekDayRow>,
) -> Result<Vec<Habit>, HabitRepositoryError> {
    let mut by_habit: HashMap<Uuid, Vec<i16>> = HashMap::new();
    for HabitWeekDayRow { habit_id, week_day } in week_day_rows {
        by_habit.entry(habit_id).or_default().push(week_day);
    }

    rows.into_iter()
        .map(|row| {
            let days = by_habit.remove(&row.id).unwrap_or_default();
            row_to_habit(row, days)
        })
        .collect()
}

/// Fetch the weekday rows for already-loaded habit rows.
async fn load_with_week_days(
    conn: &mut AsyncPgConnection,
    rows: Vec<HabitRow>,
) -> Result<Vec<Habit>, HabitRepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let week_day_rows: Vec<HabitWeekDayRow> = habit_week_days::table
        .filter(habit_week_days::habit_id.eq_any(ids))
        .select(HabitWeekDayRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    assemble_habits(rows, week_day_rows)
}

#[async_trait]
impl HabitRepository for DieselHabitRepository {
    async fn create(&self, habit: &Habit) -> Result<(), HabitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewHabitRow {
            id: *habit.id().as_uuid(),
            user_id: *habit.owner().as_uuid(),
            title: habit.title().as_ref(),
            created_on: habit.created_on(),
            created_at: habit.created_at(),
        };
        let day_rows = week_day_rows(habit);

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(habits::table)
                    .values(&new_row)
                    .execute(conn)
                    .await?;
                if !day_rows.is_empty() {
                    diesel::insert_into(habit_week_days::table)
                        .values(&day_rows)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &HabitId) -> Result<Option<Habit>, HabitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = habits::table
            .filter(habits::id.eq(id.as_uuid()))
            .select(HabitRow::as_select())
            .first::<HabitRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut loaded = load_with_week_days(&mut conn, vec![row]).await?;
        Ok(loaded.pop())
    }

    async fn list_possible_on(
        &self,
        owner: &UserId,
        date: NaiveDate,
    ) -> Result<Vec<Habit>, HabitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let week_day = i16::from(WeekDay::of(date).number());

        // The subselect keeps each habit once even with duplicate weekday rows.
        let scheduled = habit_week_days::table
            .filter(habit_week_days::week_day.eq(week_day))
            .select(habit_week_days::habit_id);
        let rows: Vec<HabitRow> = habits::table
            .filter(habits::user_id.eq(owner.as_uuid()))
            .filter(habits::created_on.le(date))
            .filter(habits::id.eq_any(scheduled))
            .order((habits::created_at.asc(), habits::id.asc()))
            .select(HabitRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        load_with_week_days(&mut conn, rows).await
    }

    async fn list_for_user(&self, owner: &UserId) -> Result<Vec<Habit>, HabitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<HabitRow> = habits::table
            .filter(habits::user_id.eq(owner.as_uuid()))
            .order((habits::created_at.asc(), habits::id.asc()))
            .select(HabitRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        load_with_week_days(&mut conn, rows).await
    }
}
