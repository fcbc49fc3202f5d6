//! Session helpers to keep HTTP handlers free of credential parsing.
//!
//! The [`SessionContext`] extractor reads `Authorization: Bearer <token>` and
//! verifies it through the [`SessionTokens`] port held in [`HttpState`].
//! Extraction itself never fails; handlers call [`SessionContext::require_claims`]
//! or [`SessionContext::require_user_id`] to fail closed with `401`.
//!
//! [`SessionTokens`]: crate::domain::ports::SessionTokens

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::{debug, warn};

use crate::domain::ports::SessionTokenError;
use crate::domain::{Error, SessionClaims, UserId};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Outcome of verifying the request's bearer credential.
#[derive(Debug, Clone)]
pub struct SessionContext(Result<SessionClaims, Error>);

impl SessionContext {
    /// Verified claims or the reason verification failed.
    pub fn require_claims(&self) -> Result<&SessionClaims, Error> {
        self.0.as_ref().map_err(Clone::clone)
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.require_claims().map(|claims| claims.sub)
    }

    fn from_request_parts(req: &HttpRequest) -> Self {
        let Some(state) = req.app_data::<web::Data<HttpState>>() else {
            warn!("session extractor used without HttpState");
            return Self(Err(Error::internal("session verification unavailable")));
        };
        let token = match bearer_token(req) {
            Ok(token) => token,
            Err(error) => return Self(Err(error)),
        };
        Self(state.sessions.verify(token).map_err(map_session_error))
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("login required"))?;
    let value = value
        .to_str()
        .map_err(|_| Error::unauthorized("authorization header is not valid ASCII"))?;
    value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("authorization header must be a bearer token"))
}

fn map_session_error(error: SessionTokenError) -> Error {
    match error {
        SessionTokenError::Expired => Error::unauthorized("session expired"),
        SessionTokenError::Invalid { message } => {
            debug!(%message, "rejected session token");
            Error::unauthorized("invalid session token")
        }
        SessionTokenError::Signing { message } => {
            Error::internal(format!("session verification failed: {message}"))
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::from_request_parts(req)))
    }
}
