// --- File: crates/travelwish_notify/src/routes.rs ---
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::handlers::{
    mark_all_read_handler, mark_feed_entry_read_handler, mark_notification_read_handler,
    provider_feed_handler, register_device_handler, unread_count_handler,
    unregister_device_handler, user_device_tokens_handler, user_notifications_handler,
    NotifyState,
};

/// Create notification and device-registry routes for the API.
///
/// Paths are relative to the `/api` prefix applied by the backend binary.
pub fn routes(state: Arc<NotifyState>) -> Router {
    info!("Notification routes initialized");

    Router::new()
        .route("/device-token/register", post(register_device_handler))
        .route("/device-token/unregister", post(unregister_device_handler))
        .route(
            "/users/{user_id}/device-tokens",
            get(user_device_tokens_handler),
        )
        // The second segment is a user id for the listing/aggregate routes and
        // a notification id for the read route; the router requires one
        // parameter name per position, so these all use `{id}`.
        .route("/notifications/{id}", get(user_notifications_handler))
        .route(
            "/notifications/{id}/read",
            put(mark_notification_read_handler),
        )
        .route("/notifications/{id}/read-all", put(mark_all_read_handler))
        .route(
            "/notifications/{id}/unread-count",
            get(unread_count_handler),
        )
        .route("/provider/feed/{id}", get(provider_feed_handler))
        .route("/provider/feed/{id}/read", put(mark_feed_entry_read_handler))
        .with_state(state)
}
