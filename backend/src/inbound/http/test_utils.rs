//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use crate::domain::ports::{
    MockHabitCommand, MockHabitQuery, MockLoginService, MockSessionTokens,
};
use crate::domain::{SessionClaims, UserId};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Token accepted by [`sessions_for`].
pub const VALID_TOKEN: &str = "valid-session";

/// Claims for `user` with a fixed issue time and one-day expiry.
pub fn claims_for(user: UserId) -> SessionClaims {
    SessionClaims {
        sub: user,
        name: "Ada Lovelace".to_owned(),
        avatar_url: "https://example.com/ada.png".to_owned(),
        iat: 1_704_067_200,
        exp: 1_704_153_600,
    }
}

/// Session codec accepting only [`VALID_TOKEN`], which resolves to `user`.
pub fn sessions_for(user: UserId) -> MockSessionTokens {
    let claims = claims_for(user);
    let mut sessions = MockSessionTokens::new();
    sessions.expect_verify().returning(move |raw| {
        if raw == VALID_TOKEN {
            Ok(claims.clone())
        } else {
            Err(crate::domain::ports::SessionTokenError::invalid("unknown token"))
        }
    });
    sessions
}

/// State wiring the given mocks; unspecified ports panic if called.
pub fn state_with(
    login: MockLoginService,
    habits: MockHabitCommand,
    habits_query: MockHabitQuery,
    sessions: MockSessionTokens,
) -> HttpState {
    HttpState::new(HttpStatePorts {
        login: Arc::new(login),
        habits: Arc::new(habits),
        habits_query: Arc::new(habits_query),
        sessions: Arc::new(sessions),
    })
}

/// State with only a session codec configured.
pub fn state_with_sessions(sessions: MockSessionTokens) -> HttpState {
    state_with(
        MockLoginService::new(),
        MockHabitCommand::new(),
        MockHabitQuery::new(),
        sessions,
    )
}

/// `Authorization` header tuple carrying `token`.
pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (
        actix_web::http::header::AUTHORIZATION,
        format!("Bearer {token}"),
    )
}
