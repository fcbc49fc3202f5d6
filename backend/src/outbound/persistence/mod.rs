//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the user, habit and completion repository
//! ports, backed by PostgreSQL through `diesel-async` with `bb8` pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Rows read back pass through the domain validators.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: Diesel and pool failures map onto the port
//!   error enums; unique violations become conflicts where a race is
//!   expected.
//!
//! # Example
//!
//! ```ignore
//! use habit_tracker::outbound::persistence::{DbPool, DieselHabitRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/habits")).await?;
//! let habits = DieselHabitRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_completion_repository;
mod diesel_habit_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_completion_repository::DieselCompletionRepository;
pub use diesel_habit_repository::DieselHabitRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
