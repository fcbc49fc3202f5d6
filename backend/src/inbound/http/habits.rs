//! Habit handlers.
//!
//! ```text
//! POST /habits {"title":"Exercise","weekDays":[1,3,5]}
//! PATCH /habits/{id}/toggle
//! ```

use actix_web::{HttpResponse, patch, post, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::ToggleOutcome;
use crate::domain::{Error, Habit, HabitId, HabitValidationError, NewHabit};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, empty_field_error, missing_field_error, out_of_range_index_error, parse_uuid,
};

const TITLE: FieldName = FieldName::new("title");
const WEEK_DAYS: FieldName = FieldName::new("weekDays");
const HABIT_ID: FieldName = FieldName::new("id");

/// Request body for `POST /habits`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitRequest {
    #[schema(example = "Exercise")]
    pub title: Option<String>,
    /// Recurrence weekdays, Sunday = 0 through Saturday = 6.
    #[schema(example = json!([1, 3, 5]))]
    pub week_days: Option<Vec<i64>>,
}

/// Habit as returned by the API.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HabitBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub title: String,
    /// Calendar date the habit became possible from.
    pub created_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub week_days: Vec<u8>,
}

impl From<&Habit> for HabitBody {
    fn from(habit: &Habit) -> Self {
        Self {
            id: habit.id().to_string(),
            title: habit.title().as_ref().to_owned(),
            created_on: habit.created_on(),
            created_at: habit.created_at(),
            week_days: habit.week_days().iter().map(|day| day.number()).collect(),
        }
    }
}

/// Response body for `PATCH /habits/{id}/toggle`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    #[schema(format = "uuid")]
    pub habit_id: String,
    pub date: NaiveDate,
    /// Completion state after the toggle.
    pub completed: bool,
}

impl From<ToggleOutcome> for ToggleResponse {
    fn from(outcome: ToggleOutcome) -> Self {
        Self {
            habit_id: outcome.habit_id.to_string(),
            date: outcome.date,
            completed: outcome.completed,
        }
    }
}

fn parse_new_habit(request: CreateHabitRequest) -> Result<NewHabit, Error> {
    let title = request.title.ok_or_else(|| missing_field_error(TITLE))?;
    let week_days = request
        .week_days
        .ok_or_else(|| missing_field_error(WEEK_DAYS))?;
    NewHabit::try_from_parts(title, &week_days).map_err(|(index, err)| match (index, err) {
        (_, HabitValidationError::EmptyTitle) => empty_field_error(TITLE),
        (Some(index), HabitValidationError::WeekDayOutOfRange { value }) => {
            out_of_range_index_error(WEEK_DAYS, index, value, "0..=6")
        }
        (_, other) => Error::invalid_request(other.to_string()),
    })
}

/// Create a habit dated today for the authenticated user.
///
/// The session is checked before any field validation.
#[utoipa::path(
    post,
    path = "/habits",
    request_body = CreateHabitRequest,
    responses(
        (status = 201, description = "Habit created", body = HabitBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["habits"],
    operation_id = "createHabit"
)]
#[post("/habits")]
pub async fn create_habit(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateHabitRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let new_habit = parse_new_habit(payload.into_inner())?;
    let habit = state.habits.create_habit(&owner, new_habit).await?;
    Ok(HttpResponse::Created().json(HabitBody::from(&habit)))
}

/// Flip today's completion of a habit owned by the caller.
#[utoipa::path(
    patch,
    path = "/habits/{id}/toggle",
    params(("id" = String, Path, description = "Habit id (UUID)")),
    responses(
        (status = 200, description = "New completion state", body = ToggleResponse),
        (status = 400, description = "Invalid habit id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Habit belongs to another user", body = ErrorSchema),
        (status = 404, description = "Habit not found", body = ErrorSchema),
        (status = 409, description = "Concurrent toggle; retry", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["habits"],
    operation_id = "toggleHabit"
)]
#[patch("/habits/{id}/toggle")]
pub async fn toggle_habit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ToggleResponse>> {
    let owner = session.require_user_id()?;
    let habit_id = HabitId::from_uuid(parse_uuid(&path.into_inner(), HABIT_ID)?);
    let outcome = state.habits.toggle_habit(&owner, &habit_id).await?;
    Ok(web::Json(ToggleResponse::from(outcome)))
}

#[cfg(test)]
#[path = "habits_tests.rs"]
mod tests;
