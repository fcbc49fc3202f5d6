//! Login domain service.
//!
//! Resolves a provider access token to a local user, creating the user on
//! first login, and signs a session credential for it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    IdentityProvider, IdentityProviderError, LoginService, SessionTokenError, SessionTokens,
    UserPersistenceError, UserRepository,
};
use crate::domain::{AccessToken, Error, ProviderProfile, SessionClaims, SessionToken, User};

fn map_identity_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::Rejected { message } => {
            Error::unauthorized(format!("access token rejected: {message}"))
        }
        IdentityProviderError::Transport { message } | IdentityProviderError::Timeout { message } => {
            Error::upstream(format!("identity provider unavailable: {message}"))
        }
        IdentityProviderError::Decode { message } => {
            Error::invalid_request(format!("identity provider profile invalid: {message}"))
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Conflict { message } => {
            Error::conflict(format!("user already exists: {message}"))
        }
    }
}

fn map_token_error(error: SessionTokenError) -> Error {
    Error::internal(format!("failed to issue session token: {error}"))
}

/// Login service backed by an identity provider, user repository and token
/// codec.
#[derive(Clone)]
pub struct IdentityResolver<P, U, T> {
    provider: Arc<P>,
    users: Arc<U>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
    session_ttl: Duration,
}

impl<P, U, T> IdentityResolver<P, U, T> {
    pub fn new(
        provider: Arc<P>,
        users: Arc<U>,
        tokens: Arc<T>,
        clock: Arc<dyn Clock>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            provider,
            users,
            tokens,
            clock,
            session_ttl,
        }
    }
}

impl<P, U, T> IdentityResolver<P, U, T>
where
    U: UserRepository,
{
    /// Existing user for the profile, or a freshly stored one.
    ///
    /// Profile fields of an existing user are left untouched.
    async fn resolve_user(&self, profile: ProviderProfile) -> Result<User, Error> {
        if let Some(user) = self
            .users
            .find_by_external_id(&profile.external_id)
            .await
            .map_err(map_user_error)?
        {
            debug!(user_id = %user.id(), "resolved existing user");
            return Ok(user);
        }

        let external_id = profile.external_id.clone();
        let user = User::register(profile);
        match self.users.insert(&user).await {
            Ok(()) => {
                info!(user_id = %user.id(), "registered new user");
                Ok(user)
            }
            Err(UserPersistenceError::Conflict { .. }) => {
                // A concurrent first login stored the row; adopt it.
                self.users
                    .find_by_external_id(&external_id)
                    .await
                    .map_err(map_user_error)?
                    .ok_or_else(|| Error::conflict("user registration raced; retry login"))
            }
            Err(other) => Err(map_user_error(other)),
        }
    }
}

#[async_trait]
impl<P, U, T> LoginService for IdentityResolver<P, U, T>
where
    P: IdentityProvider,
    U: UserRepository,
    T: SessionTokens,
{
    async fn login(&self, token: &AccessToken) -> Result<SessionToken, Error> {
        let profile = self
            .provider
            .fetch_profile(token)
            .await
            .map_err(map_identity_error)?;
        let user = self.resolve_user(profile).await?;
        let claims = SessionClaims::for_user(&user, self.clock.utc(), self.session_ttl);
        self.tokens.issue(&claims).map_err(map_token_error)
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
