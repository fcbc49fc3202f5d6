//! Port for signing and verifying session credentials.

use crate::domain::{SessionClaims, SessionToken};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session token codecs.
    pub enum SessionTokenError {
        /// The credential's expiry has passed.
        Expired => "session token expired",
        /// Signature, structure or claims failed validation.
        Invalid { message: String } => "session token invalid: {message}",
        /// The codec could not produce a signature.
        Signing { message: String } => "session token signing failed: {message}",
    }
}

/// Issue and verify signed session credentials.
#[cfg_attr(test, mockall::automock)]
pub trait SessionTokens: Send + Sync {
    fn issue(&self, claims: &SessionClaims) -> Result<SessionToken, SessionTokenError>;

    /// Check signature and expiry, returning the embedded claims.
    fn verify(&self, token: &str) -> Result<SessionClaims, SessionTokenError>;
}
