//! Driving port for login.
//!
//! Inbound adapters exchange a provider access token for a session credential
//! through this port without knowing which provider or store backs it.

use async_trait::async_trait;

use crate::domain::{AccessToken, Error, SessionToken};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Resolve the provider identity, creating the local user on first login,
    /// and return a signed session credential.
    async fn login(&self, token: &AccessToken) -> Result<SessionToken, Error>;
}
