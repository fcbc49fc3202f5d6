//! Shared harness for HTTP integration tests.
//!
//! Wires the real services to the in-memory store, a stub identity provider,
//! a pinned clock and the JWT session codec, then drives them through the
//! full Actix route table.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, test as actix_test, web};
use chrono::NaiveDate;
use mockable::Clock;
use serde_json::{Value, json};

use habit_tracker::Trace;
use habit_tracker::domain::ports::{
    HabitCommand, HabitQuery, LoginService, SessionTokens,
};
use habit_tracker::domain::{HabitService, IdentityResolver};
use habit_tracker::inbound::http;
use habit_tracker::inbound::http::state::{HttpState, HttpStatePorts};
use habit_tracker::outbound::memory::InMemoryStore;
use habit_tracker::outbound::session::JwtSessionTokens;
use habit_tracker::test_support::{FixtureClock, StubIdentityProvider, profile};

pub const SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";
pub const ADA_TOKEN: &str = "ada-access-token";
pub const GRACE_TOKEN: &str = "grace-access-token";

/// Calendar date shorthand; panics on an impossible date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

/// Services and adapters shared by one test.
pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<FixtureClock>,
    state: web::Data<HttpState>,
}

impl Harness {
    /// Harness whose clock reads noon on `today`.
    pub fn on(today: NaiveDate) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(FixtureClock::on(today));
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let provider = Arc::new(
            StubIdentityProvider::default()
                .with_profile(ADA_TOKEN, profile("1001", "Ada Lovelace"))
                .with_profile(GRACE_TOKEN, profile("1002", "Grace Hopper")),
        );
        let sessions = Arc::new(JwtSessionTokens::new(SECRET, dyn_clock.clone()));
        let login = Arc::new(IdentityResolver::new(
            provider,
            store.clone(),
            sessions.clone(),
            dyn_clock.clone(),
            chrono::Duration::days(1),
        ));
        let habits = Arc::new(HabitService::new(store.clone(), store.clone(), dyn_clock));
        let state = web::Data::new(HttpState::new(HttpStatePorts {
            login: login as Arc<dyn LoginService>,
            habits: habits.clone() as Arc<dyn HabitCommand>,
            habits_query: habits as Arc<dyn HabitQuery>,
            sessions: sessions as Arc<dyn SessionTokens>,
        }));
        Self {
            store,
            clock,
            state,
        }
    }

    /// Initialised service exposing the full route table behind [`Trace`].
    pub async fn service(
        &self,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
    {
        actix_test::init_service(
            App::new()
                .app_data(self.state.clone())
                .wrap(Trace)
                .configure(http::configure),
        )
        .await
    }
}

/// `Authorization` header carrying a session credential.
pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Log in with a provider access token and return the session credential.
pub async fn login<S, B>(app: &S, access_token: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = actix_test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "access_token": access_token }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(app, request).await;
    body["token"]
        .as_str()
        .expect("login returns a token")
        .to_owned()
}

/// Create a habit and return its id.
pub async fn create_habit<S, B>(app: &S, token: &str, title: &str, week_days: &[u8]) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = actix_test::TestRequest::post()
        .uri("/habits")
        .insert_header(bearer(token))
        .set_json(json!({ "title": title, "weekDays": week_days }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(app, request).await;
    body["id"].as_str().expect("habit id").to_owned()
}

/// Toggle today's completion and return the reported state.
pub async fn toggle<S, B>(app: &S, token: &str, habit_id: &str) -> bool
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = actix_test::TestRequest::patch()
        .uri(&format!("/habits/{habit_id}/toggle"))
        .insert_header(bearer(token))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(app, request).await;
    body["completed"].as_bool().expect("completed flag")
}

/// Read the day view for `day`.
pub async fn day_view<S, B>(app: &S, token: &str, day: NaiveDate) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = actix_test::TestRequest::get()
        .uri(&format!("/day?date={}", day.format("%Y-%m-%d")))
        .insert_header(bearer(token))
        .to_request();
    actix_test::call_and_read_body_json(app, request).await
}

/// Read the completion summary.
pub async fn summary<S, B>(app: &S, token: &str) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = actix_test::TestRequest::get()
        .uri("/summary")
        .insert_header(bearer(token))
        .to_request();
    actix_test::call_and_read_body_json(app, request).await
}

/// Ids listed under `possibleHabits` in a day view body.
pub fn possible_ids(view: &Value) -> Vec<String> {
    view["possibleHabits"]
        .as_array()
        .expect("possibleHabits array")
        .iter()
        .filter_map(|habit| habit["id"].as_str().map(str::to_owned))
        .collect()
}
