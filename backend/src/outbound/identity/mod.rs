//! Identity provider adapters.
//!
//! A thin HTTP implementation of the `IdentityProvider` port.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_USERINFO_URL, UserInfoHttpSource};
