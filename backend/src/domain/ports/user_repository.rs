//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{ExternalId, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another writer already stored a user with the same external id.
        Conflict { message: String } => "user repository conflict: {message}",
    }
}

/// Port for storing and resolving local users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by the identity provider's identifier.
    async fn find_by_external_id(
        &self,
        external_id: &ExternalId,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Insert a new user.
    ///
    /// Returns [`UserPersistenceError::Conflict`] when the external id is
    /// already taken.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;
}
