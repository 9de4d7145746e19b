// --- File: crates/travelwish_payments/src/routes.rs ---
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::handlers::{
    complete_saved_card_handler, confirm_payment_handler, create_intent_handler,
    delete_card_handler, list_cards_handler, payment_history_handler, save_card_handler,
    saved_card_payment_handler, PaymentState,
};

/// Create payment and card-vault routes for the API.
///
/// Paths are relative to the `/api` prefix applied by the backend binary.
pub fn routes(state: Arc<PaymentState>) -> Router {
    info!("Payment routes initialized");

    Router::new()
        .route("/payments/create-intent", post(create_intent_handler))
        .route("/payments/confirm", post(confirm_payment_handler))
        .route("/payments/saved-card", post(saved_card_payment_handler))
        .route(
            "/payments/saved-card/complete",
            post(complete_saved_card_handler),
        )
        .route("/payments/history", get(payment_history_handler))
        .route("/cards", post(save_card_handler).get(list_cards_handler))
        .route("/cards/{card_id}", axum::routing::delete(delete_card_handler))
        .with_state(state)
}
