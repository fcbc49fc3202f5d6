//! Authentication primitives: provider access tokens and session claims.
//!
//! Inbound adapters validate raw strings through these constructors before
//! talking to a port, so services never see blank credentials.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{User, UserId};

/// Error returned when a credential value is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Access token was missing or blank.
    EmptyAccessToken,
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAccessToken => write!(f, "access_token must not be empty"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Opaque bearer token issued by the identity provider.
///
/// # Examples
/// ```
/// use habit_tracker::domain::AccessToken;
///
/// let token = AccessToken::new("ya29.token").expect("non-empty");
/// assert_eq!(token.expose(), "ya29.token");
/// assert!(AccessToken::new("  ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    pub fn new(raw: impl Into<String>) -> Result<Self, CredentialValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(CredentialValidationError::EmptyAccessToken);
        }
        Ok(Self(Zeroizing::new(raw)))
    }

    /// Raw token, for forwarding to the provider only.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Claims carried by a signed session credential.
///
/// Serialised with `avatarUrl` in camelCase; `iat`/`exp` are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// Internal user id.
    pub sub: UserId,
    pub name: String,
    pub avatar_url: String,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    /// Claims for `user`, issued at `now` and valid for `ttl`.
    pub fn for_user(user: &User, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: *user.id(),
            name: user.display_name().as_ref().to_owned(),
            avatar_url: user.avatar_url().as_ref().to_owned(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

/// Signed session credential handed to clients.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}
