//! Shared Diesel error mapping for the habit tracker repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.into_message())
}

/// Map Diesel errors into query/connection constructors.
///
/// `NotFound` and query-builder failures map to query errors; a closed
/// connection maps to a connection error. Database messages are logged at
/// debug level only and never forwarded.
pub fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    log_diesel_error(&error);

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// Like [`map_basic_diesel_error`], but a unique-constraint violation maps
/// to the `conflict` constructor.
pub fn map_unique_diesel_error<E, Q, C, U>(
    error: DieselError,
    query: Q,
    connection: C,
    conflict: U,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
    U: FnOnce(&'static str) -> E,
{
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        debug!(
            constraint = info.constraint_name(),
            "unique constraint rejected concurrent write"
        );
        return conflict("concurrent insert detected");
    }
    map_basic_diesel_error(error, query, connection)
}

fn log_diesel_error(error: &DieselError) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }
}
