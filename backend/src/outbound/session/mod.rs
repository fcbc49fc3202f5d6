//! Session credential codecs implementing the `SessionTokens` port.

mod jwt;

pub use jwt::JwtSessionTokens;
