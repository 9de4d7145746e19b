// --- File: crates/travelwish_common/src/http.rs ---
//! HTTP response envelope and error mapping.
//!
//! Every endpoint responds with a JSON object carrying a `success` flag.
//! Errors add `error`, and gateway domain errors additionally carry
//! `error_code` plus an optional `recommendation` the client can show.

use crate::error::{HttpStatusCode, TravelWishError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};

pub mod client;

static DEVELOPMENT_MODE: AtomicBool = AtomicBool::new(false);

/// Controls whether 500-class responses echo error detail to clients.
///
/// Called once at startup from the `development` config flag; the full
/// detail is always logged server-side regardless.
pub fn set_development_mode(enabled: bool) {
    DEVELOPMENT_MODE.store(enabled, Ordering::Relaxed);
}

fn envelope_body(err: &TravelWishError, development: bool) -> serde_json::Value {
    match err {
        TravelWishError::GatewayDomainError {
            code,
            message,
            recommendation,
        } => {
            let mut body = json!({
                "success": false,
                "error": message,
                "error_code": code.as_str(),
            });
            if let Some(rec) = recommendation {
                body["recommendation"] = json!(rec);
            }
            body
        }
        other if other.status_code() >= 500 && !development => json!({
            "success": false,
            "error": "Internal server error",
        }),
        other => json!({
            "success": false,
            "error": other.to_string(),
        }),
    }
}

impl IntoResponse for TravelWishError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = envelope_body(&self, DEVELOPMENT_MODE.load(Ordering::Relaxed));

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{gateway_domain_error, not_found, GatewayErrorCode};
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_maps_to_404_envelope() {
        let (status, body) = body_json(not_found("Booking not found").into_response()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Not found: Booking not found");
        assert!(body.get("error_code").is_none());
    }

    #[tokio::test]
    async fn gateway_error_carries_code_and_recommendation() {
        let err = gateway_domain_error(
            GatewayErrorCode::OldCardFormat,
            "This card was saved in an old format",
            Some("Please delete this card and add it again"),
        );
        let (status, body) = body_json(err.into_response()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "OLD_CARD_FORMAT");
        assert_eq!(
            body["recommendation"],
            "Please delete this card and add it again"
        );
    }

    #[test]
    fn database_detail_is_hidden_outside_development() {
        let err = TravelWishError::DatabaseError("UNIQUE constraint failed".to_string());
        let body = envelope_body(&err, false);
        assert_eq!(body["error"], "Internal server error");
    }

    #[test]
    fn database_detail_is_echoed_in_development() {
        let err = TravelWishError::DatabaseError("UNIQUE constraint failed".to_string());
        let body = envelope_body(&err, true);
        assert_eq!(body["error"], "Database error: UNIQUE constraint failed");
    }
}
