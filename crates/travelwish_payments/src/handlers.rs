// --- File: crates/travelwish_payments/src/handlers.rs ---
//! HTTP handlers for payments and the card vault.
//!
//! Every endpoint here requires an authenticated caller; the
//! [`AuthenticatedUser`] extractor rejects the request with a 401 envelope
//! before the handler body runs.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

use crate::error::PaymentError;
use crate::logic::{
    complete_saved_card_payment, confirm_payment, create_intent, list_cards, pay_with_saved_card,
    payment_history, remove_card, save_card, CompletePaymentRequest, ConfirmPaymentRequest,
    CreateIntentRequest, SaveCardRequest, SavedCardOutcome, SavedCardPaymentRequest,
};
use travelwish_common::auth::AuthenticatedUser;
use travelwish_common::error::TravelWishError;
use travelwish_db::{CardTokenRepository, UserRepository};

/// Shared state for payment handlers.
#[derive(Clone)]
pub struct PaymentState {
    pub gateway: Arc<dyn travelwish_common::services::PaymentGatewayService>,
    pub users: Arc<dyn UserRepository>,
    pub cards: Arc<dyn CardTokenRepository>,
    pub default_currency: String,
}

fn error_response(err: PaymentError) -> Response {
    error!("Payment operation failed: {}", err);
    TravelWishError::from(err).into_response()
}

#[axum::debug_handler]
pub async fn create_intent_handler(
    State(state): State<Arc<PaymentState>>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateIntentRequest>,
) -> Response {
    debug!(user_id = %user.id, "Creating payment intent");

    match create_intent(
        state.gateway.as_ref(),
        &user,
        &state.default_currency,
        payload,
    )
    .await
    {
        Ok(response) => Json(json!({
            "success": true,
            "client_secret": response.client_secret,
            "payment_intent_id": response.payment_intent_id,
            "amount": response.amount,
            "currency": response.currency,
        }))
        .into_response(),
        Err(err) => error_response(err),
    }
}

#[axum::debug_handler]
pub async fn confirm_payment_handler(
    State(state): State<Arc<PaymentState>>,
    user: AuthenticatedUser,
    Json(payload): Json<ConfirmPaymentRequest>,
) -> Response {
    debug!(user_id = %user.id, "Confirming payment");

    match confirm_payment(
        state.gateway.as_ref(),
        state.users.as_ref(),
        state.cards.as_ref(),
        &user,
        payload,
    )
    .await
    {
        Ok(response) => Json(json!({
            "success": true,
            "payment_intent_id": response.payment_intent_id,
            "status": response.status,
            "amount": response.amount,
            "currency": response.currency,
            "saved_card": response.saved_card,
        }))
        .into_response(),
        Err(err) => error_response(err),
    }
}

#[axum::debug_handler]
pub async fn saved_card_payment_handler(
    State(state): State<Arc<PaymentState>>,
    user: AuthenticatedUser,
    Json(payload): Json<SavedCardPaymentRequest>,
) -> Response {
    debug!(user_id = %user.id, card_id = ?payload.card_id, "Paying with saved card");

    match pay_with_saved_card(
        state.gateway.as_ref(),
        state.users.as_ref(),
        state.cards.as_ref(),
        &user,
        &state.default_currency,
        payload,
    )
    .await
    {
        Ok(outcome) => saved_card_outcome_response(outcome),
        Err(err) => error_response(err),
    }
}

fn saved_card_outcome_response(outcome: SavedCardOutcome) -> Response {
    match outcome {
        SavedCardOutcome::RequiresAction {
            payment_intent_id,
            client_secret,
            ..
        } => Json(json!({
            "success": true,
            "requires_action": true,
            "payment_intent_id": payment_intent_id,
            "client_secret": client_secret,
        }))
        .into_response(),
        SavedCardOutcome::Succeeded {
            payment_intent_id,
            status,
            amount,
            currency,
            card,
        } => Json(json!({
            "success": true,
            "payment_intent_id": payment_intent_id,
            "status": status,
            "amount": amount,
            "currency": currency,
            "card": card,
        }))
        .into_response(),
    }
}

#[axum::debug_handler]
pub async fn complete_saved_card_handler(
    State(state): State<Arc<PaymentState>>,
    user: AuthenticatedUser,
    Json(payload): Json<CompletePaymentRequest>,
) -> Response {
    debug!(user_id = %user.id, intent_id = ?payload.payment_intent_id, "Completing saved-card payment");

    match complete_saved_card_payment(state.gateway.as_ref(), state.cards.as_ref(), &user, payload)
        .await
    {
        Ok(outcome) => saved_card_outcome_response(outcome),
        Err(err) => error_response(err),
    }
}

#[axum::debug_handler]
pub async fn payment_history_handler(
    State(state): State<Arc<PaymentState>>,
    user: AuthenticatedUser,
) -> Response {
    match payment_history(state.gateway.as_ref(), state.users.as_ref(), &user).await {
        Ok(payments) => Json(json!({
            "success": true,
            "count": payments.len(),
            "payments": payments,
        }))
        .into_response(),
        Err(err) => error_response(err),
    }
}

#[axum::debug_handler]
pub async fn save_card_handler(
    State(state): State<Arc<PaymentState>>,
    user: AuthenticatedUser,
    Json(payload): Json<SaveCardRequest>,
) -> Response {
    debug!(user_id = %user.id, "Saving card");

    match save_card(
        state.gateway.as_ref(),
        state.users.as_ref(),
        state.cards.as_ref(),
        &user,
        payload,
    )
    .await
    {
        Ok(card) => (
            StatusCode::CREATED,
            Json(json!({ "success": true, "card": card })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

#[axum::debug_handler]
pub async fn list_cards_handler(
    State(state): State<Arc<PaymentState>>,
    user: AuthenticatedUser,
) -> Response {
    match list_cards(state.cards.as_ref(), &user).await {
        Ok(cards) => Json(json!({
            "success": true,
            "count": cards.len(),
            "cards": cards,
        }))
        .into_response(),
        Err(err) => error_response(err),
    }
}

#[axum::debug_handler]
pub async fn delete_card_handler(
    State(state): State<Arc<PaymentState>>,
    user: AuthenticatedUser,
    Path(card_id): Path<String>,
) -> Response {
    debug!(user_id = %user.id, card_id = %card_id, "Removing card");

    match remove_card(state.cards.as_ref(), &user, &card_id).await {
        Ok(()) => Json(json!({ "success": true, "message": "Card removed" })).into_response(),
        Err(err) => error_response(err),
    }
}
