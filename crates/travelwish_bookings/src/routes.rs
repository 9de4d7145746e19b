// --- File: crates/travelwish_bookings/src/routes.rs ---
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::handlers::{
    create_booking_handler, get_booking_status_handler, provider_bookings_handler,
    update_booking_status_handler, user_bookings_handler, BookingState,
};

/// Create booking routes for the API.
///
/// Paths are relative to the `/api` prefix applied by the backend binary.
pub fn routes(state: Arc<BookingState>) -> Router {
    info!("Booking routes initialized");

    Router::new()
        .route("/bookings", post(create_booking_handler))
        .route(
            "/bookings/{booking_id}/status",
            put(update_booking_status_handler).get(get_booking_status_handler),
        )
        .route(
            "/provider/bookings/{provider_id}",
            get(provider_bookings_handler),
        )
        .route("/users/{user_id}/bookings", get(user_bookings_handler))
        .with_state(state)
}
