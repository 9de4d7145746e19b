// --- File: crates/travelwish_stripe/src/logic.rs ---
//! Low-level gateway REST calls.
//!
//! Every call goes through the shared `HTTP_CLIENT` (bounded timeout),
//! authenticates with the secret key via basic auth, and sends form-encoded
//! bodies the way the gateway's API expects.

use serde::Deserialize;
use std::env;
use tracing::{error, info};

use travelwish_common::services::{
    CreateIntentParams, GatewayCustomer, GatewayError, GatewayPaymentMethod, PaymentIntent,
};
use travelwish_common::HTTP_CLIENT;

/// Default gateway API base when none is configured.
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

fn gateway_secret_key() -> Result<String, GatewayError> {
    env::var("GATEWAY_SECRET_KEY").map_err(|_| GatewayError::ConfigError)
}

/// Shape of the gateway's error body: `{"error": {"message", "type", "code"}}`.
#[derive(Deserialize, Debug)]
struct GatewayErrorBody {
    error: Option<GatewayErrorDetail>,
}

#[derive(Deserialize, Debug)]
struct GatewayErrorDetail {
    message: Option<String>,
    #[serde(rename = "type")]
    error_type: Option<String>,
    #[allow(dead_code)]
    code: Option<String>,
}

/// Classifies a non-success gateway response into the error taxonomy.
///
/// Card errors and missing/detached payment methods get their own variants;
/// everything else surfaces as a raw API error with the gateway's message.
pub fn classify_error_body(status_code: u16, body_text: &str) -> GatewayError {
    let (message, error_type) = match serde_json::from_str::<GatewayErrorBody>(body_text) {
        Ok(parsed) => {
            let detail = parsed.error;
            (
                detail
                    .as_ref()
                    .and_then(|d| d.message.clone())
                    .unwrap_or_else(|| body_text.to_string()),
                detail.and_then(|d| d.error_type),
            )
        }
        Err(_) => (body_text.to_string(), None),
    };

    if error_type.as_deref() == Some("card_error") {
        return GatewayError::CardDeclined(message);
    }

    let lowered = message.to_lowercase();
    if lowered.contains("no such payment_method")
        || (lowered.contains("payment_method") && lowered.contains("does not exist"))
    {
        return GatewayError::PaymentMethodNotFound(message);
    }
    if lowered.contains("not attached") {
        return GatewayError::PaymentMethodNotAttached(message);
    }

    GatewayError::ApiError {
        status_code,
        message,
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, GatewayError> {
    let status = response.status();
    let body_text = response
        .text()
        .await
        .map_err(|e| GatewayError::RequestError(e.to_string()))?;

    if status.is_success() {
        serde_json::from_str(&body_text).map_err(|e| GatewayError::ParseError(e.to_string()))
    } else {
        error!(
            "[Gateway] API request failed with HTTP status: {}. Body: {}",
            status, body_text
        );
        Err(classify_error_body(status.as_u16(), &body_text))
    }
}

/// Creates a payment intent at the gateway.
pub async fn create_payment_intent(
    api_base: &str,
    params: CreateIntentParams,
) -> Result<PaymentIntent, GatewayError> {
    let secret_key = gateway_secret_key()?;
    info!(
        "[Gateway] Creating payment intent: amount={} {}",
        params.amount_minor, params.currency
    );

    let mut form_body: Vec<(String, String)> = vec![
        ("amount".to_string(), params.amount_minor.to_string()),
        ("currency".to_string(), params.currency.to_lowercase()),
    ];

    for (key, value) in &params.metadata {
        form_body.push((format!("metadata[{}]", key), value.clone()));
    }
    if let Some(customer) = &params.customer_id {
        form_body.push(("customer".to_string(), customer.clone()));
    }
    if let Some(payment_method) = &params.payment_method_id {
        form_body.push(("payment_method".to_string(), payment_method.clone()));
    }
    if params.manual_confirmation {
        form_body.push(("confirmation_method".to_string(), "manual".to_string()));
    }
    if params.confirm {
        form_body.push(("confirm".to_string(), "true".to_string()));
    }
    if params.automatic_payment_methods {
        form_body.push((
            "automatic_payment_methods[enabled]".to_string(),
            "true".to_string(),
        ));
    }

    let api_url = format!("{}/v1/payment_intents", api_base);
    let response = HTTP_CLIENT
        .post(&api_url)
        .basic_auth(secret_key, None::<&str>)
        .form(&form_body)
        .send()
        .await
        .map_err(|e| GatewayError::RequestError(e.to_string()))?;

    parse_response(response).await
}

/// Retrieves a payment intent by id.
pub async fn retrieve_payment_intent(
    api_base: &str,
    intent_id: &str,
) -> Result<PaymentIntent, GatewayError> {
    let secret_key = gateway_secret_key()?;

    let api_url = format!("{}/v1/payment_intents/{}", api_base, intent_id);
    let response = HTTP_CLIENT
        .get(&api_url)
        .basic_auth(secret_key, None::<&str>)
        .send()
        .await
        .map_err(|e| GatewayError::RequestError(e.to_string()))?;

    parse_response(response).await
}

/// Confirms a payment intent created in manual confirmation mode.
pub async fn confirm_payment_intent(
    api_base: &str,
    intent_id: &str,
) -> Result<PaymentIntent, GatewayError> {
    let secret_key = gateway_secret_key()?;
    info!("[Gateway] Confirming payment intent: {}", intent_id);

    let api_url = format!("{}/v1/payment_intents/{}/confirm", api_base, intent_id);
    let response = HTTP_CLIENT
        .post(&api_url)
        .basic_auth(secret_key, None::<&str>)
        .form(&Vec::<(String, String)>::new())
        .send()
        .await
        .map_err(|e| GatewayError::RequestError(e.to_string()))?;

    parse_response(response).await
}

/// Creates a gateway customer carrying the user's id in metadata.
pub async fn create_customer(
    api_base: &str,
    email: &str,
    name: &str,
    metadata: &std::collections::HashMap<String, String>,
) -> Result<GatewayCustomer, GatewayError> {
    let secret_key = gateway_secret_key()?;
    info!("[Gateway] Creating customer for email: {}", email);

    let mut form_body: Vec<(String, String)> = vec![
        ("email".to_string(), email.to_string()),
        ("name".to_string(), name.to_string()),
    ];
    for (key, value) in metadata {
        form_body.push((format!("metadata[{}]", key), value.clone()));
    }

    let api_url = format!("{}/v1/customers", api_base);
    let response = HTTP_CLIENT
        .post(&api_url)
        .basic_auth(secret_key, None::<&str>)
        .form(&form_body)
        .send()
        .await
        .map_err(|e| GatewayError::RequestError(e.to_string()))?;

    parse_response(response).await
}

/// Retrieves a payment method, including its card display fields and the
/// customer it is attached to.
pub async fn retrieve_payment_method(
    api_base: &str,
    payment_method_id: &str,
) -> Result<GatewayPaymentMethod, GatewayError> {
    let secret_key = gateway_secret_key()?;

    let api_url = format!("{}/v1/payment_methods/{}", api_base, payment_method_id);
    let response = HTTP_CLIENT
        .get(&api_url)
        .basic_auth(secret_key, None::<&str>)
        .send()
        .await
        .map_err(|e| GatewayError::RequestError(e.to_string()))?;

    parse_response(response).await
}

/// Attaches a payment method to a customer.
pub async fn attach_payment_method(
    api_base: &str,
    payment_method_id: &str,
    customer_id: &str,
) -> Result<GatewayPaymentMethod, GatewayError> {
    let secret_key = gateway_secret_key()?;
    info!(
        "[Gateway] Attaching payment method {} to customer {}",
        payment_method_id, customer_id
    );

    let form_body = vec![("customer".to_string(), customer_id.to_string())];

    let api_url = format!(
        "{}/v1/payment_methods/{}/attach",
        api_base, payment_method_id
    );
    let response = HTTP_CLIENT
        .post(&api_url)
        .basic_auth(secret_key, None::<&str>)
        .form(&form_body)
        .send()
        .await
        .map_err(|e| GatewayError::RequestError(e.to_string()))?;

    parse_response(response).await
}

/// Wrapper for the gateway's list responses: `{"data": [...]}`.
#[derive(Deserialize, Debug)]
struct GatewayListResponse<T> {
    data: Vec<T>,
}

/// Lists recent payment intents for a customer, newest first.
pub async fn list_payment_intents(
    api_base: &str,
    customer_id: &str,
    limit: u8,
) -> Result<Vec<PaymentIntent>, GatewayError> {
    let secret_key = gateway_secret_key()?;

    let api_url = format!(
        "{}/v1/payment_intents?customer={}&limit={}",
        api_base, customer_id, limit
    );
    let response = HTTP_CLIENT
        .get(&api_url)
        .basic_auth(secret_key, None::<&str>)
        .send()
        .await
        .map_err(|e| GatewayError::RequestError(e.to_string()))?;

    let list: GatewayListResponse<PaymentIntent> = parse_response(response).await?;
    Ok(list.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_error_type_classifies_as_declined() {
        let body = r#"{"error": {"type": "card_error", "code": "card_declined", "message": "Your card was declined."}}"#;
        match classify_error_body(402, body) {
            GatewayError::CardDeclined(msg) => assert_eq!(msg, "Your card was declined."),
            other => panic!("Expected CardDeclined, got {:?}", other),
        }
    }

    #[test]
    fn missing_payment_method_is_classified() {
        let body = r#"{"error": {"type": "invalid_request_error", "message": "No such payment_method: 'pm_123'"}}"#;
        assert!(matches!(
            classify_error_body(404, body),
            GatewayError::PaymentMethodNotFound(_)
        ));
    }

    #[test]
    fn detached_payment_method_is_classified() {
        let body = r#"{"error": {"type": "invalid_request_error", "message": "The payment method you provided is not attached to a customer."}}"#;
        assert!(matches!(
            classify_error_body(400, body),
            GatewayError::PaymentMethodNotAttached(_)
        ));
    }

    #[test]
    fn unknown_errors_surface_status_and_message() {
        let body = r#"{"error": {"type": "api_error", "message": "Something went wrong."}}"#;
        match classify_error_body(500, body) {
            GatewayError::ApiError {
                status_code,
                message,
            } => {
                assert_eq!(status_code, 500);
                assert_eq!(message, "Something went wrong.");
            }
            other => panic!("Expected ApiError, got {:?}", other),
        }
    }

    #[test]
    fn unparseable_body_falls_back_to_raw_text() {
        match classify_error_body(502, "<html>Bad gateway</html>") {
            GatewayError::ApiError { message, .. } => {
                assert_eq!(message, "<html>Bad gateway</html>");
            }
            other => panic!("Expected ApiError, got {:?}", other),
        }
    }
}
