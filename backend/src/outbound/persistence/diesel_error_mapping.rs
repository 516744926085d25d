//! Shared Diesel error classification for the repository adapters.
//!
//! Repositories translate a [`DieselFailure`] into their own port error, so
//! the match over Diesel's error kinds and the debug logging live in one
//! place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse classification of a failed Diesel operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection(&'static str),
    /// A foreign key constraint rejected the write.
    ForeignKey { constraint: Option<String> },
    /// A unique constraint rejected the write.
    Unique { constraint: Option<String> },
    /// Anything else.
    Query(&'static str),
}

impl DieselFailure {
    /// Collapse into connection/query constructors for repositories without
    /// constraint-specific errors.
    pub(crate) fn into_basic<E>(
        self,
        query: impl FnOnce(String) -> E,
        connection: impl FnOnce(String) -> E,
    ) -> E {
        match self {
            Self::Connection(message) => connection(message.to_owned()),
            Self::ForeignKey { .. } => query("foreign key violation".to_owned()),
            Self::Unique { .. } => query("unique constraint violation".to_owned()),
            Self::Query(message) => query(message.to_owned()),
        }
    }
}

/// Extract a readable message from a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error and emit debug context.
pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DieselFailure::ForeignKey {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::Unique {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        _ => DieselFailure::Query("database error"),
    }
}
