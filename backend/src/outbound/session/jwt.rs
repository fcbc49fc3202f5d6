//! HS256 JSON Web Tokens as session credentials.
//!
//! The signature and claim shape are checked by `jsonwebtoken`; expiry is
//! checked against the injected clock so the codec agrees with the services
//! on what "now" is.

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{SessionTokenError, SessionTokens};
use crate::domain::{SessionClaims, SessionToken};

/// Signs and verifies session credentials with a shared secret.
pub struct JwtSessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl JwtSessionTokens {
    /// Build a codec keyed by `secret`.
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            clock,
        }
    }
}

impl SessionTokens for JwtSessionTokens {
    fn issue(&self, claims: &SessionClaims) -> Result<SessionToken, SessionTokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map(SessionToken::new)
            .map_err(|error| SessionTokenError::signing(error.to_string()))
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, SessionTokenError> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map_err(|error| {
                debug!(kind = ?error.kind(), "session token rejected");
                match error.kind() {
                    ErrorKind::ExpiredSignature => SessionTokenError::expired(),
                    _ => SessionTokenError::invalid(error.to_string()),
                }
            })?;
        if data.claims.exp <= self.clock.utc().timestamp() {
            return Err(SessionTokenError::expired());
        }
        Ok(data.claims)
    }
}
