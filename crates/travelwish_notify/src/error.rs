// --- File: crates/travelwish_notify/src/error.rs ---
use thiserror::Error;
use travelwish_common::error::TravelWishError;
use travelwish_db::DbError;

/// Notification and device-registry error types.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DbError(#[from] DbError),
}

impl From<NotifyError> for TravelWishError {
    fn from(err: NotifyError) -> Self {
        match err {
            NotifyError::ValidationError(msg) => TravelWishError::ValidationError(msg),
            NotifyError::NotFound(msg) => TravelWishError::NotFoundError(msg),
            NotifyError::DbError(e) => TravelWishError::DatabaseError(e.to_string()),
        }
    }
}
