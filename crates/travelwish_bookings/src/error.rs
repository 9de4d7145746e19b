// --- File: crates/travelwish_bookings/src/error.rs ---
use thiserror::Error;
use travelwish_common::error::TravelWishError;
use travelwish_db::DbError;

/// Booking-specific error types.
#[derive(Error, Debug)]
pub enum BookingError {
    /// One or more required request fields are absent
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// Malformed field values (bad dates, guest count, unknown status)
    #[error("{0}")]
    ValidationError(String),

    /// The requested transition is not in the lifecycle table
    #[error("Cannot change booking status from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    /// Booking or resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Database failure
    #[error("Database error: {0}")]
    DbError(#[from] DbError),
}

impl From<BookingError> for TravelWishError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::MissingFields(_) => TravelWishError::ValidationError(err.to_string()),
            BookingError::ValidationError(msg) => TravelWishError::ValidationError(msg),
            BookingError::InvalidTransition { .. } => {
                TravelWishError::ValidationError(err.to_string())
            }
            BookingError::NotFound(msg) => TravelWishError::NotFoundError(msg),
            BookingError::DbError(e) => TravelWishError::DatabaseError(e.to_string()),
        }
    }
}
