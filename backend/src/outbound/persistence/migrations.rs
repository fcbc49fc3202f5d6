//! Embedded schema migrations, applied at startup when a database is set.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while bringing the schema up to date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {message}")]
    Connection { message: String },
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
}

/// Apply every pending migration to `database_url`.
///
/// Blocking; call before the server starts accepting requests.
///
/// # Errors
///
/// Returns [`MigrationError`] when the connection or a migration fails.
pub fn run_pending_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| {
        MigrationError::Connection {
            message: err.to_string(),
        }
    })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    info!(count = applied.len(), "database migrations applied");
    Ok(applied.len())
}
