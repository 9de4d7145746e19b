// --- File: crates/travelwish_payments/src/error.rs ---
use thiserror::Error;
use travelwish_common::error::{GatewayErrorCode, TravelWishError};
use travelwish_common::services::GatewayError;
use travelwish_db::DbError;

/// Payment orchestration error types.
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    NotFound(String),

    /// The stored card predates the gateway linkage and cannot be charged
    #[error("This card was saved in an old format and cannot be used for payments")]
    OldCardFormat,

    /// The user has no gateway customer record
    #[error("No payment profile is linked to this account")]
    MissingCustomerId,

    /// A card with the same gateway payment method is already saved
    #[error("This card is already saved")]
    DuplicateCard,

    /// Classified gateway failure
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Database error: {0}")]
    DbError(#[from] DbError),
}

impl From<PaymentError> for TravelWishError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::ValidationError(msg) => TravelWishError::ValidationError(msg),
            PaymentError::NotFound(msg) => TravelWishError::NotFoundError(msg),
            PaymentError::OldCardFormat => TravelWishError::GatewayDomainError {
                code: GatewayErrorCode::OldCardFormat,
                message: "This card was saved in an old format and cannot be used for payments"
                    .to_string(),
                recommendation: Some("Please delete this card and add it again".to_string()),
            },
            PaymentError::MissingCustomerId => TravelWishError::GatewayDomainError {
                code: GatewayErrorCode::MissingCustomerId,
                message: "No payment profile is linked to this account".to_string(),
                recommendation: Some("Please add a card before paying".to_string()),
            },
            PaymentError::DuplicateCard => {
                TravelWishError::ConflictError("This card is already saved".to_string())
            }
            PaymentError::Gateway(gateway_err) => match gateway_err {
                GatewayError::CardDeclined(msg) => TravelWishError::GatewayDomainError {
                    code: GatewayErrorCode::CardDeclined,
                    message: msg,
                    recommendation: Some("Please try a different card".to_string()),
                },
                GatewayError::PaymentMethodNotFound(msg) => TravelWishError::GatewayDomainError {
                    code: GatewayErrorCode::PaymentMethodNotFound,
                    message: msg,
                    recommendation: Some("Please delete this card and add it again".to_string()),
                },
                GatewayError::PaymentMethodNotAttached(msg) => {
                    TravelWishError::GatewayDomainError {
                        code: GatewayErrorCode::PaymentMethodNotAttached,
                        message: msg,
                        recommendation: Some(
                            "Please delete this card and add it again".to_string(),
                        ),
                    }
                }
                other => travelwish_common::error::external_service_error(
                    "payment gateway",
                    other.to_string(),
                ),
            },
            PaymentError::DbError(e) => TravelWishError::DatabaseError(e.to_string()),
        }
    }
}
