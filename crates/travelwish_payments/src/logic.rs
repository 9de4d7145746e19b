// --- File: crates/travelwish_payments/src/logic.rs ---
//! Payment orchestration and card vaulting.
//!
//! Amounts cross this boundary in major units and are converted to the
//! currency's minor unit before any gateway call. The gateway customer id is
//! created lazily and cached on the user record. Card vaulting is idempotent:
//! the `UNIQUE(user_id, gateway_payment_method_id)` constraint is the source
//! of truth and a constraint violation is folded into the existing row.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::error::PaymentError;
use travelwish_common::auth::AuthenticatedUser;
use travelwish_common::services::{
    CreateIntentParams, GatewayError, PaymentGatewayService, PaymentIntent,
};
use travelwish_db::{CardToken, CardTokenRepository, NewCardToken, UserRepository};

/// Default transaction currency (Sri Lankan rupee).
pub const DEFAULT_CURRENCY: &str = "lkr";

/// History listing size requested from the gateway.
const HISTORY_LIMIT: u8 = 10;

// --- Data Structures ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateIntentRequest {
    /// Amount in major units, e.g. 24000.0 LKR
    #[cfg_attr(feature = "openapi", schema(example = 24000.0))]
    pub amount: Option<f64>,
    #[cfg_attr(feature = "openapi", schema(example = "lkr"))]
    pub currency: Option<String>,
    #[serde(default)]
    pub save_card: bool,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateIntentResponse {
    pub client_secret: Option<String>,
    pub payment_intent_id: String,
    pub amount: f64,
    pub currency: String,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CardDetailsInput {
    pub card_holder_name: Option<String>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ConfirmPaymentRequest {
    pub payment_intent_id: Option<String>,
    #[serde(default)]
    pub save_card: bool,
    pub payment_method_id: Option<String>,
    pub card_details: Option<CardDetailsInput>,
}

/// Masked display form of a stored card.
#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CardDisplay {
    pub card_id: String,
    pub card_holder_name: String,
    pub masked_number: String,
    pub expiry: String,
    pub brand: Option<String>,
}

impl From<&CardToken> for CardDisplay {
    fn from(token: &CardToken) -> Self {
        Self {
            card_id: token.id.clone(),
            card_holder_name: token.card_holder_name.clone(),
            masked_number: token.masked_number.clone(),
            expiry: token.expiry.clone(),
            brand: token.brand.clone(),
        }
    }
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ConfirmPaymentResponse {
    pub payment_intent_id: String,
    pub status: String,
    pub amount: f64,
    pub currency: String,
    /// Present when the card was vaulted during confirmation
    pub saved_card: Option<CardDisplay>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SavedCardPaymentRequest {
    pub card_id: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = 24000.0))]
    pub amount: Option<f64>,
    pub currency: Option<String>,
}

/// Outcome of a saved-card payment.
#[derive(Serialize, Debug)]
#[serde(untagged)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum SavedCardOutcome {
    /// 3DS challenge required; client must complete it with the secret
    RequiresAction {
        requires_action: bool,
        payment_intent_id: String,
        client_secret: Option<String>,
    },
    /// Payment settled
    Succeeded {
        payment_intent_id: String,
        status: String,
        amount: f64,
        currency: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        card: Option<CardDisplay>,
    },
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CompletePaymentRequest {
    pub payment_intent_id: Option<String>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SaveCardRequest {
    pub gateway_payment_method_id: Option<String>,
    pub card_holder_name: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PaymentHistoryEntry {
    pub payment_intent_id: String,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    /// Unix seconds
    pub created: Option<i64>,
}

// --- Helpers ---

/// Converts a major-unit amount to the gateway's minor unit.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub fn to_major_units(amount_minor: i64) -> f64 {
    amount_minor as f64 / 100.0
}

fn mask_number(last4: &str) -> String {
    format!("****-****-****-{}", last4)
}

fn format_expiry(exp_month: u32, exp_year: u32) -> String {
    format!("{:02}/{:02}", exp_month, exp_year % 100)
}

fn validated_amount(amount: Option<f64>) -> Result<f64, PaymentError> {
    match amount {
        Some(a) if a > 0.0 => Ok(a),
        _ => Err(PaymentError::ValidationError(
            "amount must be greater than 0".to_string(),
        )),
    }
}

fn resolve_currency(requested: Option<String>, default_currency: &str) -> String {
    requested
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| default_currency.to_string())
        .to_lowercase()
}

/// Returns the user's gateway customer id, creating and caching one when the
/// user has none yet.
async fn get_or_create_customer(
    gateway: &dyn PaymentGatewayService,
    users: &dyn UserRepository,
    user: &AuthenticatedUser,
) -> Result<String, PaymentError> {
    let record = users
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| PaymentError::NotFound(format!("User not found: {}", user.id)))?;

    if let Some(customer_id) = record.gateway_customer_id {
        return Ok(customer_id);
    }

    let mut metadata = HashMap::new();
    metadata.insert("user_id".to_string(), user.id.clone());
    let customer = gateway
        .create_customer(&record.email, &record.full_name, metadata)
        .await?;

    users.set_gateway_customer_id(&user.id, &customer.id).await?;
    info!(user_id = %user.id, customer_id = %customer.id, "Gateway customer created");
    Ok(customer.id)
}

/// Attaches the payment method to the customer and vaults it, returning the
/// stored token. Idempotent: an existing (user, payment method) row wins.
async fn vault_payment_method(
    gateway: &dyn PaymentGatewayService,
    users: &dyn UserRepository,
    cards: &dyn CardTokenRepository,
    user: &AuthenticatedUser,
    payment_method_id: &str,
    card_holder_name: Option<String>,
) -> Result<CardToken, PaymentError> {
    let customer_id = get_or_create_customer(gateway, users, user).await?;

    let payment_method = gateway.retrieve_payment_method(payment_method_id).await?;
    if payment_method.customer.as_deref() != Some(customer_id.as_str()) {
        gateway
            .attach_payment_method(payment_method_id, &customer_id)
            .await?;
    }

    if let Some(existing) = cards
        .find_by_payment_method(&user.id, payment_method_id)
        .await?
    {
        return Ok(existing);
    }

    let card = payment_method.card.as_ref().ok_or_else(|| {
        PaymentError::ValidationError("Payment method carries no card details".to_string())
    })?;

    let new_token = NewCardToken {
        user_id: user.id.clone(),
        card_holder_name: card_holder_name.unwrap_or_else(|| user.full_name.clone()),
        masked_number: mask_number(&card.last4),
        expiry: format_expiry(card.exp_month, card.exp_year),
        brand: card.brand.clone(),
        gateway_payment_method_id: Some(payment_method_id.to_string()),
        gateway_customer_id: Some(customer_id),
    };

    match cards.insert(new_token).await {
        Ok(token) => Ok(token),
        // A concurrent confirm beat us to the insert; the constraint is
        // authoritative, fold into the winner's row
        Err(e) if e.is_unique_violation() => cards
            .find_by_payment_method(&user.id, payment_method_id)
            .await?
            .ok_or(PaymentError::DbError(e)),
        Err(e) => Err(e.into()),
    }
}

// --- Core Logic Functions ---

/// Creates a payment intent for a new-card payment.
pub async fn create_intent(
    gateway: &dyn PaymentGatewayService,
    user: &AuthenticatedUser,
    default_currency: &str,
    request: CreateIntentRequest,
) -> Result<CreateIntentResponse, PaymentError> {
    let amount = validated_amount(request.amount)?;
    let currency = resolve_currency(request.currency, default_currency);

    let mut metadata = HashMap::new();
    metadata.insert("user_id".to_string(), user.id.clone());
    metadata.insert("user_email".to_string(), user.email.clone());
    metadata.insert("save_card".to_string(), request.save_card.to_string());

    let intent = gateway
        .create_payment_intent(CreateIntentParams {
            amount_minor: to_minor_units(amount),
            currency: currency.clone(),
            automatic_payment_methods: true,
            metadata,
            ..Default::default()
        })
        .await?;

    info!(payment_intent_id = %intent.id, amount = amount, "Payment intent created");

    Ok(CreateIntentResponse {
        client_secret: intent.client_secret,
        payment_intent_id: intent.id,
        amount,
        currency,
    })
}

/// Verifies a completed payment and optionally vaults the card used.
///
/// Vaulting is best-effort: a failure is logged and the payment still reports
/// success with `saved_card: None`.
pub async fn confirm_payment(
    gateway: &dyn PaymentGatewayService,
    users: &dyn UserRepository,
    cards: &dyn CardTokenRepository,
    user: &AuthenticatedUser,
    request: ConfirmPaymentRequest,
) -> Result<ConfirmPaymentResponse, PaymentError> {
    let intent_id = request
        .payment_intent_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            PaymentError::ValidationError("payment_intent_id is required".to_string())
        })?;

    let intent = gateway.retrieve_payment_intent(&intent_id).await?;
    if intent.status != "succeeded" {
        return Err(PaymentError::ValidationError(format!(
            "Payment not completed. Status: {}",
            intent.status
        )));
    }

    let saved_card = if request.save_card {
        match (&request.payment_method_id, &request.card_details) {
            (Some(pm_id), Some(details)) if !pm_id.is_empty() => {
                match vault_payment_method(
                    gateway,
                    users,
                    cards,
                    user,
                    pm_id,
                    details.card_holder_name.clone(),
                )
                .await
                {
                    Ok(token) => Some(CardDisplay::from(&token)),
                    Err(e) => {
                        warn!(user_id = %user.id, error = %e, "Card vaulting failed after successful payment");
                        None
                    }
                }
            }
            _ => None,
        }
    } else {
        None
    };

    Ok(ConfirmPaymentResponse {
        payment_intent_id: intent.id,
        status: intent.status,
        amount: to_major_units(intent.amount),
        currency: intent.currency,
        saved_card,
    })
}

/// Charges a previously vaulted card.
pub async fn pay_with_saved_card(
    gateway: &dyn PaymentGatewayService,
    users: &dyn UserRepository,
    cards: &dyn CardTokenRepository,
    user: &AuthenticatedUser,
    default_currency: &str,
    request: SavedCardPaymentRequest,
) -> Result<SavedCardOutcome, PaymentError> {
    let card_id = request
        .card_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| PaymentError::ValidationError("card_id is required".to_string()))?;
    let amount = validated_amount(request.amount)?;
    let currency = resolve_currency(request.currency, default_currency);

    let card = cards
        .find_active_for_user(&card_id, &user.id)
        .await?
        .ok_or_else(|| PaymentError::NotFound(format!("Card not found: {}", card_id)))?;

    // Legacy rows have no gateway linkage; fail before any gateway call
    let payment_method_id = card
        .gateway_payment_method_id
        .clone()
        .ok_or(PaymentError::OldCardFormat)?;

    let record = users
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| PaymentError::NotFound(format!("User not found: {}", user.id)))?;
    let customer_id = record
        .gateway_customer_id
        .ok_or(PaymentError::MissingCustomerId)?;

    // Drift repair: the gateway may know the method under a different (or no)
    // customer; re-attach before confirming
    let payment_method = gateway.retrieve_payment_method(&payment_method_id).await?;
    if payment_method.customer.as_deref() != Some(customer_id.as_str()) {
        info!(card_id = %card.id, "Re-attaching drifted payment method");
        gateway
            .attach_payment_method(&payment_method_id, &customer_id)
            .await?;
    }

    let mut metadata = HashMap::new();
    metadata.insert("user_id".to_string(), user.id.clone());
    metadata.insert("card_id".to_string(), card.id.clone());

    let intent = gateway
        .create_payment_intent(CreateIntentParams {
            amount_minor: to_minor_units(amount),
            currency: currency.clone(),
            customer_id: Some(customer_id),
            payment_method_id: Some(payment_method_id),
            confirm: true,
            manual_confirmation: true,
            automatic_payment_methods: false,
            metadata,
        })
        .await?;

    match intent.status.as_str() {
        "requires_action" | "requires_source_action" => Ok(SavedCardOutcome::RequiresAction {
            requires_action: true,
            payment_intent_id: intent.id,
            client_secret: intent.client_secret,
        }),
        "succeeded" => {
            info!(payment_intent_id = %intent.id, card_id = %card.id, "Saved-card payment succeeded");
            Ok(SavedCardOutcome::Succeeded {
                payment_intent_id: intent.id,
                status: intent.status,
                amount: to_major_units(intent.amount),
                currency: intent.currency,
                card: Some(CardDisplay::from(&card)),
            })
        }
        other => Err(PaymentError::ValidationError(format!(
            "Payment failed. Status: {}",
            other
        ))),
    }
}

/// Completes a saved-card payment after the client has finished the 3DS
/// challenge.
///
/// The intent was created in manual confirmation mode, so the final charge
/// happens here, server-side. A failed challenge surfaces as another
/// `requires_action` outcome with a fresh client secret.
pub async fn complete_saved_card_payment(
    gateway: &dyn PaymentGatewayService,
    cards: &dyn CardTokenRepository,
    user: &AuthenticatedUser,
    request: CompletePaymentRequest,
) -> Result<SavedCardOutcome, PaymentError> {
    let intent_id = request
        .payment_intent_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            PaymentError::ValidationError("payment_intent_id is required".to_string())
        })?;

    let intent = gateway.confirm_payment_intent(&intent_id).await?;

    match intent.status.as_str() {
        "requires_action" | "requires_source_action" => Ok(SavedCardOutcome::RequiresAction {
            requires_action: true,
            payment_intent_id: intent.id,
            client_secret: intent.client_secret,
        }),
        "succeeded" => {
            info!(payment_intent_id = %intent.id, "Saved-card payment completed after challenge");
            let card = match &intent.payment_method {
                Some(pm_id) => cards
                    .find_by_payment_method(&user.id, pm_id)
                    .await?
                    .as_ref()
                    .map(CardDisplay::from),
                None => None,
            };
            Ok(SavedCardOutcome::Succeeded {
                payment_intent_id: intent.id,
                status: intent.status,
                amount: to_major_units(intent.amount),
                currency: intent.currency,
                card,
            })
        }
        other => Err(PaymentError::ValidationError(format!(
            "Payment failed. Status: {}",
            other
        ))),
    }
}

/// Explicitly saves a card from a gateway payment method. Unlike the
/// confirm-time vaulting this is not idempotent: a duplicate is a conflict.
pub async fn save_card(
    gateway: &dyn PaymentGatewayService,
    users: &dyn UserRepository,
    cards: &dyn CardTokenRepository,
    user: &AuthenticatedUser,
    request: SaveCardRequest,
) -> Result<CardDisplay, PaymentError> {
    let payment_method_id = request
        .gateway_payment_method_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            PaymentError::ValidationError("gateway_payment_method_id is required".to_string())
        })?;

    if cards
        .find_by_payment_method(&user.id, &payment_method_id)
        .await?
        .is_some()
    {
        return Err(PaymentError::DuplicateCard);
    }

    let customer_id = get_or_create_customer(gateway, users, user).await?;
    let payment_method = gateway.retrieve_payment_method(&payment_method_id).await?;
    if payment_method.customer.as_deref() != Some(customer_id.as_str()) {
        gateway
            .attach_payment_method(&payment_method_id, &customer_id)
            .await?;
    }

    let card = payment_method.card.as_ref().ok_or_else(|| {
        PaymentError::ValidationError("Payment method carries no card details".to_string())
    })?;

    let new_token = NewCardToken {
        user_id: user.id.clone(),
        card_holder_name: request
            .card_holder_name
            .unwrap_or_else(|| user.full_name.clone()),
        masked_number: mask_number(&card.last4),
        expiry: format_expiry(card.exp_month, card.exp_year),
        brand: card.brand.clone(),
        gateway_payment_method_id: Some(payment_method_id),
        gateway_customer_id: Some(customer_id),
    };

    match cards.insert(new_token).await {
        Ok(token) => Ok(CardDisplay::from(&token)),
        Err(e) if e.is_unique_violation() => Err(PaymentError::DuplicateCard),
        Err(e) => Err(e.into()),
    }
}

/// Lists the caller's active cards, masked fields only.
pub async fn list_cards(
    cards: &dyn CardTokenRepository,
    user: &AuthenticatedUser,
) -> Result<Vec<CardDisplay>, PaymentError> {
    let tokens = cards.find_active_by_user(&user.id).await?;
    Ok(tokens.iter().map(CardDisplay::from).collect())
}

/// Deactivates a card. The row is kept for audit; it simply stops matching
/// active lookups.
pub async fn remove_card(
    cards: &dyn CardTokenRepository,
    user: &AuthenticatedUser,
    card_id: &str,
) -> Result<(), PaymentError> {
    if cards.deactivate(card_id, &user.id).await? {
        Ok(())
    } else {
        Err(PaymentError::NotFound(format!(
            "Card not found: {}",
            card_id
        )))
    }
}

/// The caller's recent payments as reported by the gateway.
pub async fn payment_history(
    gateway: &dyn PaymentGatewayService,
    users: &dyn UserRepository,
    user: &AuthenticatedUser,
) -> Result<Vec<PaymentHistoryEntry>, PaymentError> {
    let record = users
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| PaymentError::NotFound(format!("User not found: {}", user.id)))?;

    let Some(customer_id) = record.gateway_customer_id else {
        // Nothing has ever been charged for this user
        return Ok(Vec::new());
    };

    let intents = gateway
        .list_payment_intents(&customer_id, HISTORY_LIMIT)
        .await?;

    Ok(intents.into_iter().map(history_entry).collect())
}

fn history_entry(intent: PaymentIntent) -> PaymentHistoryEntry {
    PaymentHistoryEntry {
        payment_intent_id: intent.id,
        amount: to_major_units(intent.amount),
        currency: intent.currency,
        status: intent.status,
        created: intent.created,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minor_unit_conversion_rounds_correctly() {
        assert_eq!(to_minor_units(24000.0), 2400000);
        assert_eq!(to_minor_units(19.99), 1999);
        assert_eq!(to_minor_units(0.015), 2);
        assert_eq!(to_major_units(2400000), 24000.0);
    }

    #[test]
    fn card_display_fields_are_masked() {
        assert_eq!(mask_number("4242"), "****-****-****-4242");
        assert_eq!(format_expiry(3, 2027), "03/27");
        assert_eq!(format_expiry(12, 2030), "12/30");
    }

    #[test]
    fn currency_defaults_and_lowercases() {
        assert_eq!(resolve_currency(None, DEFAULT_CURRENCY), "lkr");
        assert_eq!(resolve_currency(Some("USD".to_string()), "lkr"), "usd");
        assert_eq!(resolve_currency(Some(String::new()), "lkr"), "lkr");
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        assert!(validated_amount(Some(0.0)).is_err());
        assert!(validated_amount(Some(-5.0)).is_err());
        assert!(validated_amount(None).is_err());
        assert!(validated_amount(Some(0.01)).is_ok());
    }
}
