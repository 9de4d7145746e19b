// --- File: crates/travelwish_payments/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{
    CardDisplay, CompletePaymentRequest, ConfirmPaymentRequest, ConfirmPaymentResponse,
    CreateIntentRequest, CreateIntentResponse, PaymentHistoryEntry, SaveCardRequest,
    SavedCardPaymentRequest,
};

#[utoipa::path(
    post,
    path = "/payments/create-intent", // Path relative to /api
    request_body(content = CreateIntentRequest, example = json!({
        "amount": 24000.0,
        "currency": "lkr",
        "save_card": true
    })),
    responses(
        (status = 200, description = "Payment intent created", body = CreateIntentResponse),
        (status = 400, description = "Amount missing or not positive"),
        (status = 401, description = "Authentication required")
    ),
    tag = "Payments"
)]
fn doc_create_intent_handler() {}

#[utoipa::path(
    post,
    path = "/payments/confirm",
    request_body = ConfirmPaymentRequest,
    responses(
        (status = 200, description = "Payment verified; card vaulted when requested", body = ConfirmPaymentResponse),
        (status = 400, description = "Payment not completed at the gateway"),
        (status = 401, description = "Authentication required")
    ),
    tag = "Payments"
)]
fn doc_confirm_payment_handler() {}

#[utoipa::path(
    post,
    path = "/payments/saved-card",
    request_body = SavedCardPaymentRequest,
    responses(
        (status = 200, description = "Payment succeeded or requires a 3DS challenge"),
        (status = 400, description = "Card unusable (old format, declined, detached)"),
        (status = 404, description = "Card not found for this user")
    ),
    tag = "Payments"
)]
fn doc_saved_card_payment_handler() {}

#[utoipa::path(
    post,
    path = "/payments/saved-card/complete",
    request_body = CompletePaymentRequest,
    responses(
        (status = 200, description = "Payment completed, or another challenge is required"),
        (status = 400, description = "Intent missing or payment failed at the gateway")
    ),
    tag = "Payments"
)]
fn doc_complete_saved_card_handler() {}

#[utoipa::path(
    get,
    path = "/payments/history",
    responses(
        (status = 200, description = "The caller's recent payments", body = [PaymentHistoryEntry])
    ),
    tag = "Payments"
)]
fn doc_payment_history_handler() {}

#[utoipa::path(
    post,
    path = "/cards",
    request_body = SaveCardRequest,
    responses(
        (status = 201, description = "Card vaulted", body = CardDisplay),
        (status = 409, description = "Card already saved")
    ),
    tag = "Cards"
)]
fn doc_save_card_handler() {}

#[utoipa::path(
    get,
    path = "/cards",
    responses((status = 200, description = "The caller's active cards, masked", body = [CardDisplay])),
    tag = "Cards"
)]
fn doc_list_cards_handler() {}

#[utoipa::path(
    delete,
    path = "/cards/{card_id}",
    params(("card_id" = String, Path, description = "The card to remove")),
    responses(
        (status = 200, description = "Card deactivated"),
        (status = 404, description = "Card not found for this user")
    ),
    tag = "Cards"
)]
fn doc_delete_card_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_create_intent_handler,
        doc_confirm_payment_handler,
        doc_saved_card_payment_handler,
        doc_complete_saved_card_handler,
        doc_payment_history_handler,
        doc_save_card_handler,
        doc_list_cards_handler,
        doc_delete_card_handler
    ),
    components(schemas(
        CreateIntentRequest,
        CreateIntentResponse,
        ConfirmPaymentRequest,
        ConfirmPaymentResponse,
        SavedCardPaymentRequest,
        CompletePaymentRequest,
        SaveCardRequest,
        CardDisplay,
        PaymentHistoryEntry
    )),
    tags(
        (name = "Payments", description = "Payment orchestration API"),
        (name = "Cards", description = "Saved-card vault API")
    )
)]
pub struct PaymentApiDoc;
