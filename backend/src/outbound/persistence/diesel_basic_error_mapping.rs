//! Shared translation of pool and Diesel failures into port errors.
//!
//! Every repository port exposes `Connection` and `Query` variants; callers
//! pass the matching constructors so one mapping serves all of them.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure onto a port's connection error.
pub fn map_basic_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let message = match error {
        PoolError::Checkout(message) | PoolError::Build(message) => message,
    };
    debug!(%message, "database pool unavailable");
    connection(message)
}

/// Map a Diesel failure onto a port's query or connection error.
///
/// Database messages are logged at debug level and replaced by a generic
/// description so driver details do not leak to clients.
pub fn map_basic_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => connection("database connection error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            query("duplicate record")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            query("referenced record does not exist")
        }
        DieselError::NotFound => query("record not found"),
        DieselError::DeserializationError(_) => query("stored record could not be decoded"),
        _ => query("database error"),
    }
}
