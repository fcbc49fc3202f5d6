//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod completion_repository;
mod habit_command;
mod habit_query;
mod habit_repository;
mod identity_provider;
mod login_service;
mod session_tokens;
mod user_repository;

#[cfg(test)]
pub use completion_repository::MockCompletionRepository;
pub use completion_repository::{CompletionRepository, CompletionRepositoryError};
#[cfg(test)]
pub use habit_command::MockHabitCommand;
pub use habit_command::{HabitCommand, ToggleOutcome};
#[cfg(test)]
pub use habit_query::MockHabitQuery;
pub use habit_query::HabitQuery;
#[cfg(test)]
pub use habit_repository::MockHabitRepository;
pub use habit_repository::{HabitRepository, HabitRepositoryError};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use session_tokens::MockSessionTokens;
pub use session_tokens::{SessionTokenError, SessionTokens};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
