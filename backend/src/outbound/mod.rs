//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: volatile store used when no database is configured
//! - **identity**: reqwest client for the identity provider's user-info call
//! - **session**: JWT codec for session credentials
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod identity;
pub mod memory;
pub mod persistence;
pub mod session;
