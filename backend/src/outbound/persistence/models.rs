//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{day_habits, days, habit_week_days, habits, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub external_id: String,
    pub display_name: String,
    pub email: String,
    pub avatar_url: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub external_id: &'a str,
    pub display_name: &'a str,
    pub email: &'a str,
    pub avatar_url: &'a str,
}

// ---------------------------------------------------------------------------
// Habit models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = habits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HabitRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub created_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = habits)]
pub(crate) struct NewHabitRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: &'a str,
    pub created_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Recurrence row as read back for a batch of habits.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = habit_week_days)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HabitWeekDayRow {
    pub habit_id: Uuid,
    pub week_day: i16,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = habit_week_days)]
pub(crate) struct NewHabitWeekDayRow {
    pub id: Uuid,
    pub habit_id: Uuid,
    pub week_day: i16,
}

// ---------------------------------------------------------------------------
// Day ledger models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = days)]
pub(crate) struct NewDayRow {
    pub id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = day_habits)]
pub(crate) struct NewDayHabitRow {
    pub id: Uuid,
    pub day_id: Uuid,
    pub habit_id: Uuid,
}
