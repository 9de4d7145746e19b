//! Error types for the database client

use thiserror::Error;

/// Errors that can occur when working with the database client
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Error with database URL parsing
    #[error("Database URL error: {0}")]
    UrlError(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// Error with database query
    #[error("Database query error: {0}")]
    QueryError(String),

    /// A UNIQUE constraint rejected the write
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Error with database transaction
    #[error("Database transaction error: {0}")]
    TransactionError(String),
}

impl DbError {
    /// Classifies a query error, surfacing unique-constraint violations as
    /// their own variant so callers can map them to a conflict response.
    pub fn from_query_error(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            let message = db_err.message().to_string();
            // `kind()` is reliable for native drivers; the message check covers
            // the Any driver where the kind can be lost in the erasure.
            if db_err.is_unique_violation()
                || message.contains("UNIQUE constraint failed")
                || message.contains("duplicate key")
            {
                return DbError::UniqueViolation(message);
            }
        }
        DbError::QueryError(e.to_string())
    }

    /// True when the error is a unique-constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::UniqueViolation(_))
    }
}
