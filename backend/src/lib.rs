//! Habit tracker backend library modules.
//!
//! Hexagonal layout: `domain` holds types, services and ports; `inbound`
//! exposes them over HTTP; `outbound` implements the ports against
//! PostgreSQL, memory, the identity provider and the JWT codec.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
