//! Day view and summary handlers.
//!
//! ```text
//! GET /day?date=2024-01-01
//! GET /summary
//! ```

use actix_web::{get, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{DaySummary, DayView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::habits::HabitBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_calendar_day};

const DATE: FieldName = FieldName::new("date");

/// Query parameters for `GET /day`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct DayQuery {
    /// `YYYY-MM-DD`, or an RFC 3339 timestamp truncated to the server's
    /// local day.
    pub date: Option<String>,
}

/// Response body for `GET /day`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayResponse {
    pub possible_habits: Vec<HabitBody>,
    /// Ids of habits completed on the day.
    pub completed_habits: Vec<String>,
}

impl From<DayView> for DayResponse {
    fn from(view: DayView) -> Self {
        Self {
            possible_habits: view.possible.iter().map(HabitBody::from).collect(),
            completed_habits: view.completed.iter().map(ToString::to_string).collect(),
        }
    }
}

/// One entry of `GET /summary`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DaySummaryBody {
    pub date: NaiveDate,
    /// Completions recorded that day.
    pub completed: u64,
    /// Habits possible that day. May be lower than `completed`.
    pub amount: u64,
}

impl From<DaySummary> for DaySummaryBody {
    fn from(day_summary: DaySummary) -> Self {
        Self {
            date: day_summary.date,
            completed: day_summary.completed,
            amount: day_summary.amount,
        }
    }
}

/// Habits possible on a date and the ones completed.
#[utoipa::path(
    get,
    path = "/day",
    params(DayQuery),
    responses(
        (status = 200, description = "Day view", body = DayResponse),
        (status = 400, description = "Invalid date", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["days"],
    operation_id = "getDay"
)]
#[get("/day")]
pub async fn day(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<DayQuery>,
) -> ApiResult<web::Json<DayResponse>> {
    let owner = session.require_user_id()?;
    let raw = query
        .into_inner()
        .date
        .ok_or_else(|| missing_field_error(DATE))?;
    let date = parse_calendar_day(&raw, DATE)?;
    let view = state.habits_query.day_view(&owner, date).await?;
    Ok(web::Json(DayResponse::from(view)))
}

/// Completion counts for every day with at least one completion.
#[utoipa::path(
    get,
    path = "/summary",
    responses(
        (status = 200, description = "Per-day summary, oldest first", body = [DaySummaryBody]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["days"],
    operation_id = "getSummary"
)]
#[get("/summary")]
pub async fn summary(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<DaySummaryBody>>> {
    let owner = session.require_user_id()?;
    let summaries = state.habits_query.summary(&owner).await?;
    Ok(web::Json(
        summaries.into_iter().map(DaySummaryBody::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockHabitCommand, MockHabitQuery, MockLoginService};
    use crate::domain::{Error, Habit, HabitDraft, HabitId, HabitTitle, UserId, WeekDay};
    use crate::inbound::http::test_utils::{VALID_TOKEN, bearer, sessions_for, state_with};
    use crate::inbound::http::validation::query_config;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).expect("date")
    }

    fn app_state(user: UserId, query: MockHabitQuery) -> HttpState {
        state_with(
            MockLoginService::new(),
            MockHabitCommand::new(),
            query,
            sessions_for(user),
        )
    }

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .app_data(query_config())
            .service(day)
            .service(summary)
    }

    #[actix_web::test]
    async fn day_lists_possible_and_completed_habits() {
        let user = UserId::random();
        let habit = Habit::new(HabitDraft {
            id: HabitId::random(),
            owner: user,
            title: HabitTitle::new("Exercise").expect("title"),
            created_on: monday(),
            created_at: Utc::now(),
            week_days: vec![WeekDay::MONDAY],
        });
        let habit_id = *habit.id();
        let mut query = MockHabitQuery::new();
        query
            .expect_day_view()
            .withf(move |owner, date| *owner == user && *date == monday())
            .return_once(move |_, _| {
                Ok(DayView {
                    possible: vec![habit],
                    completed: vec![habit_id],
                })
            });
        let app = actix_test::init_service(test_app(app_state(user, query))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/day?date=2024-01-01")
                .insert_header(bearer(VALID_TOKEN))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["possibleHabits"][0]["id"], json!(habit_id.to_string()));
        assert_eq!(body["completedHabits"], json!([habit_id.to_string()]));
    }

    #[rstest]
    #[case("/day", "missing_field")]
    #[case("/day?date=someday", "invalid_date")]
    #[actix_web::test]
    async fn day_requires_a_valid_date(#[case] uri: &str, #[case] code: &str) {
        let mut query = MockHabitQuery::new();
        query.expect_day_view().times(0);
        let app = actix_test::init_service(test_app(app_state(UserId::random(), query))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(uri)
                .insert_header(bearer(VALID_TOKEN))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["code"], json!(code));
    }

    #[rstest]
    #[case("/day?date=2024-01-01")]
    #[case("/summary")]
    #[actix_web::test]
    async fn reads_require_a_session(#[case] uri: &str) {
        let mut query = MockHabitQuery::new();
        query.expect_day_view().times(0);
        query.expect_summary().times(0);
        let app = actix_test::init_service(test_app(app_state(UserId::random(), query))).await;

        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], json!("unauthorized"));
    }

    #[actix_web::test]
    async fn summary_serialises_unclamped_counts() {
        let user = UserId::random();
        let mut query = MockHabitQuery::new();
        query.expect_summary().return_once(|_| {
            Ok(vec![DaySummary {
                date: monday(),
                completed: 2,
                amount: 1,
            }])
        });
        let app = actix_test::init_service(test_app(app_state(user, query))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/summary")
                .insert_header(bearer(VALID_TOKEN))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body,
            json!([{ "date": "2024-01-01", "completed": 2, "amount": 1 }])
        );
    }

    #[actix_web::test]
    async fn summary_store_outage_is_service_unavailable() {
        let mut query = MockHabitQuery::new();
        query
            .expect_summary()
            .return_once(|_| Err(Error::service_unavailable("db down")));
        let app = actix_test::init_service(test_app(app_state(UserId::random(), query))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/summary")
                .insert_header(bearer(VALID_TOKEN))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
