//! Port for the external identity provider's user-info lookup.

use async_trait::async_trait;

use crate::domain::{AccessToken, ProviderProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised while resolving an access token to a profile.
    pub enum IdentityProviderError {
        /// The provider refused the access token.
        Rejected { message: String } => "identity provider rejected token: {message}",
        /// The request could not be completed or returned a failure status.
        Transport { message: String } => "identity provider request failed: {message}",
        /// The provider did not answer within the configured timeout.
        Timeout { message: String } => "identity provider timed out: {message}",
        /// The response did not match the expected profile shape.
        Decode { message: String } => "identity provider response invalid: {message}",
    }
}

/// Resolve a provider access token to a validated profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn fetch_profile(
        &self,
        token: &AccessToken,
    ) -> Result<ProviderProfile, IdentityProviderError>;
}
