//! Reqwest-backed identity provider adapter.
//!
//! Sends the caller's access token to a user-info endpoint as a bearer
//! credential and decodes the answer into a validated profile. The adapter
//! owns transport concerns only: timeout, status mapping and decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::UserInfoDto;
use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{AccessToken, ProviderProfile};

/// Google's OAuth2 user-info endpoint.
pub const DEFAULT_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Identity provider adapter that performs one GET per login.
pub struct UserInfoHttpSource {
    client: Client,
    endpoint: Url,
}

impl UserInfoHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl IdentityProvider for UserInfoHttpSource {
    async fn fetch_profile(
        &self,
        token: &AccessToken,
    ) -> Result<ProviderProfile, IdentityProviderError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .bearer_auth(token.expose())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status));
        }

        parse_profile(body.as_ref())
    }
}

fn parse_profile(body: &[u8]) -> Result<ProviderProfile, IdentityProviderError> {
    let decoded: UserInfoDto = serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::decode(format!("invalid user-info payload: {error}"))
    })?;
    decoded.into_profile().map_err(IdentityProviderError::decode)
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    if error.is_timeout() {
        IdentityProviderError::timeout(error.to_string())
    } else {
        IdentityProviderError::transport(error.to_string())
    }
}

/// Response bodies are not echoed; they may quote the token.
fn map_status_error(status: StatusCode) -> IdentityProviderError {
    let message = format!("status {}", status.as_u16());
    debug!(status = status.as_u16(), "identity provider refused request");
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            IdentityProviderError::rejected(message)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            IdentityProviderError::timeout(message)
        }
        _ => IdentityProviderError::transport(message),
    }
}
