// --- File: crates/travelwish_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// Machine-readable codes for card-gateway domain errors.
///
/// These are the categories a client is expected to branch on (e.g. prompt
/// the user to add a new card) instead of parsing raw gateway messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorCode {
    /// The stored card token has no gateway payment-method linkage.
    OldCardFormat,
    /// The user was never linked to a gateway customer record.
    MissingCustomerId,
    /// The gateway no longer knows the referenced payment method.
    PaymentMethodNotFound,
    /// The payment method is not attached to the expected customer.
    PaymentMethodNotAttached,
    /// The card itself was declined.
    CardDeclined,
    /// Any other gateway-side failure.
    GatewayError,
}

impl GatewayErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayErrorCode::OldCardFormat => "OLD_CARD_FORMAT",
            GatewayErrorCode::MissingCustomerId => "MISSING_CUSTOMER_ID",
            GatewayErrorCode::PaymentMethodNotFound => "PAYMENT_METHOD_NOT_FOUND",
            GatewayErrorCode::PaymentMethodNotAttached => "PAYMENT_METHOD_NOT_ATTACHED",
            GatewayErrorCode::CardDeclined => "CARD_DECLINED",
            GatewayErrorCode::GatewayError => "GATEWAY_ERROR",
        }
    }
}

/// The base error type for all TravelWish errors.
///
/// This enum provides a common set of error variants that can be used across
/// all crates. Each feature crate can extend this by implementing
/// `From<SpecificError> for TravelWishError`.
#[derive(Error, Debug)]
pub enum TravelWishError {
    /// Missing or malformed request fields
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Request lacks an authenticated user context
    #[error("Authentication required")]
    Unauthenticated,

    /// Referenced resource does not exist for the caller
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Duplicate of a unique field (e.g. re-saving the same payment method)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Card-gateway domain error with a machine-readable code
    #[error("{message}")]
    GatewayDomainError {
        code: GatewayErrorCode,
        message: String,
        recommendation: Option<String>,
    },

    /// Error occurred during a database operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred during an external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for TravelWishError {
    fn status_code(&self) -> u16 {
        match self {
            TravelWishError::ValidationError(_) => 400,
            TravelWishError::Unauthenticated => 401,
            TravelWishError::NotFoundError(_) => 404,
            TravelWishError::ConflictError(_) => 409,
            TravelWishError::GatewayDomainError { .. } => 400,
            TravelWishError::DatabaseError(_) => 500,
            TravelWishError::ExternalServiceError { .. } => 500,
            TravelWishError::InternalError(_) => 500,
        }
    }
}

// Utility functions for error handling
pub fn validation_error<T: fmt::Display>(message: T) -> TravelWishError {
    TravelWishError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> TravelWishError {
    TravelWishError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> TravelWishError {
    TravelWishError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> TravelWishError {
    TravelWishError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn gateway_domain_error<T: fmt::Display>(
    code: GatewayErrorCode,
    message: T,
    recommendation: Option<&str>,
) -> TravelWishError {
    TravelWishError::GatewayDomainError {
        code,
        message: message.to_string(),
        recommendation: recommendation.map(String::from),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> TravelWishError {
    TravelWishError::InternalError(message.to_string())
}
