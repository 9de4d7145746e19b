// --- File: crates/travelwish_notify/src/handlers.rs ---
//! HTTP handlers for device registration, in-app notifications, and the
//! provider feed.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

use crate::error::NotifyError;
use crate::feed::ProviderFeed;
use travelwish_common::error::TravelWishError;
use travelwish_db::{DevicePlatform, DeviceTokenRepository, NotificationRepository};

/// Shared state for notification handlers.
#[derive(Clone)]
pub struct NotifyState {
    pub devices: Arc<dyn DeviceTokenRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub feed: Arc<ProviderFeed>,
}

fn error_response(err: NotifyError) -> Response {
    error!("Notification operation failed: {}", err);
    TravelWishError::from(err).into_response()
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RegisterDeviceRequest {
    pub user_id: Option<String>,
    pub token: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "android"))]
    pub platform: Option<String>,
    pub device_id: Option<String>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UnregisterDeviceRequest {
    pub token: Option<String>,
}

fn required(value: Option<String>, field: &str) -> Result<String, NotifyError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| NotifyError::ValidationError(format!("{} is required", field)))
}

#[axum::debug_handler]
pub async fn register_device_handler(
    State(state): State<Arc<NotifyState>>,
    Json(payload): Json<RegisterDeviceRequest>,
) -> Response {
    let result: Result<_, NotifyError> = async {
        let user_id = required(payload.user_id, "user_id")?;
        let token = required(payload.token, "token")?;
        let platform_raw = required(payload.platform, "platform")?;
        let device_id = required(payload.device_id, "device_id")?;

        let platform: DevicePlatform = platform_raw
            .parse()
            .map_err(NotifyError::ValidationError)?;

        debug!(user_id = %user_id, platform = %platform, "Registering device token");
        Ok(state
            .devices
            .register(&user_id, &token, platform, &device_id)
            .await?)
    }
    .await;

    match result {
        Ok((device, created)) => {
            let status = if created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (
                status,
                Json(json!({
                    "success": true,
                    "device_token_id": device.id,
                    "created": created,
                })),
            )
                .into_response()
        }
        Err(err) => error_response(err),
    }
}

#[axum::debug_handler]
pub async fn unregister_device_handler(
    State(state): State<Arc<NotifyState>>,
    Json(payload): Json<UnregisterDeviceRequest>,
) -> Response {
    let result: Result<_, NotifyError> = async {
        let token = required(payload.token, "token")?;
        if state.devices.deactivate_by_token(&token).await? {
            Ok(())
        } else {
            Err(NotifyError::NotFound("Device token not found".to_string()))
        }
    }
    .await;

    match result {
        Ok(()) => {
            Json(json!({ "success": true, "message": "Device token unregistered" })).into_response()
        }
        Err(err) => error_response(err),
    }
}

#[axum::debug_handler]
pub async fn user_device_tokens_handler(
    State(state): State<Arc<NotifyState>>,
    Path(user_id): Path<String>,
) -> Response {
    match state.devices.find_by_user(&user_id).await {
        Ok(tokens) => Json(json!({
            "success": true,
            "count": tokens.len(),
            "device_tokens": tokens,
        }))
        .into_response(),
        Err(err) => error_response(err.into()),
    }
}

#[axum::debug_handler]
pub async fn user_notifications_handler(
    State(state): State<Arc<NotifyState>>,
    Path(user_id): Path<String>,
) -> Response {
    match state.notifications.find_by_user(&user_id).await {
        Ok(notifications) => Json(json!({
            "success": true,
            "count": notifications.len(),
            "notifications": notifications,
        }))
        .into_response(),
        Err(err) => error_response(err.into()),
    }
}

#[axum::debug_handler]
pub async fn mark_notification_read_handler(
    State(state): State<Arc<NotifyState>>,
    Path(notification_id): Path<String>,
) -> Response {
    let result: Result<_, NotifyError> = async {
        if state.notifications.mark_read(&notification_id).await? {
            Ok(())
        } else {
            Err(NotifyError::NotFound(format!(
                "Notification not found: {}",
                notification_id
            )))
        }
    }
    .await;

    match result {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(err) => error_response(err),
    }
}

#[axum::debug_handler]
pub async fn mark_all_read_handler(
    State(state): State<Arc<NotifyState>>,
    Path(user_id): Path<String>,
) -> Response {
    match state.notifications.mark_all_read(&user_id).await {
        Ok(modified) => Json(json!({ "success": true, "modified": modified })).into_response(),
        Err(err) => error_response(err.into()),
    }
}

#[axum::debug_handler]
pub async fn unread_count_handler(
    State(state): State<Arc<NotifyState>>,
    Path(user_id): Path<String>,
) -> Response {
    match state.notifications.unread_count(&user_id).await {
        Ok(count) => Json(json!({ "success": true, "unread_count": count })).into_response(),
        Err(err) => error_response(err.into()),
    }
}

#[axum::debug_handler]
pub async fn provider_feed_handler(
    State(state): State<Arc<NotifyState>>,
    Path(provider_id): Path<String>,
) -> Response {
    let entries = state.feed.for_provider(&provider_id);
    Json(json!({
        "success": true,
        "count": entries.len(),
        "feed": entries,
    }))
    .into_response()
}

#[axum::debug_handler]
pub async fn mark_feed_entry_read_handler(
    State(state): State<Arc<NotifyState>>,
    Path(entry_id): Path<String>,
) -> Response {
    if state.feed.mark_read(&entry_id) {
        Json(json!({ "success": true })).into_response()
    } else {
        error_response(NotifyError::NotFound(format!(
            "Feed entry not found: {}",
            entry_id
        )))
    }
}
