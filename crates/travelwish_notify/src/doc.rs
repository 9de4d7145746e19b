// --- File: crates/travelwish_notify/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::feed::FeedEntry;
use crate::handlers::{RegisterDeviceRequest, UnregisterDeviceRequest};

#[utoipa::path(
    post,
    path = "/device-token/register", // Path relative to /api
    request_body(content = RegisterDeviceRequest, example = json!({
        "user_id": "usr_a41",
        "token": "fcm-registration-token",
        "platform": "android",
        "device_id": "pixel-8-amara"
    })),
    responses(
        (status = 201, description = "New device token registered"),
        (status = 200, description = "Existing token reassigned and reactivated"),
        (status = 400, description = "Missing field or unsupported platform")
    ),
    tag = "Devices"
)]
fn doc_register_device_handler() {}

#[utoipa::path(
    post,
    path = "/device-token/unregister",
    request_body = UnregisterDeviceRequest,
    responses(
        (status = 200, description = "Token marked inactive"),
        (status = 404, description = "Token unknown")
    ),
    tag = "Devices"
)]
fn doc_unregister_device_handler() {}

#[utoipa::path(
    get,
    path = "/users/{user_id}/device-tokens",
    params(("user_id" = String, Path, description = "User whose tokens to list")),
    responses((status = 200, description = "All tokens for the user, active or not")),
    tag = "Devices"
)]
fn doc_user_device_tokens_handler() {}

#[utoipa::path(
    get,
    path = "/notifications/{user_id}",
    params(("user_id" = String, Path, description = "User whose notifications to list")),
    responses((status = 200, description = "The user's notifications, newest first")),
    tag = "Notifications"
)]
fn doc_user_notifications_handler() {}

#[utoipa::path(
    put,
    path = "/notifications/{notification_id}/read",
    params(("notification_id" = String, Path, description = "The notification to mark read")),
    responses(
        (status = 200, description = "Marked read"),
        (status = 404, description = "Notification not found")
    ),
    tag = "Notifications"
)]
fn doc_mark_notification_read_handler() {}

#[utoipa::path(
    put,
    path = "/notifications/{user_id}/read-all",
    params(("user_id" = String, Path, description = "User whose notifications to mark read")),
    responses((status = 200, description = "Modified count returned")),
    tag = "Notifications"
)]
fn doc_mark_all_read_handler() {}

#[utoipa::path(
    get,
    path = "/notifications/{user_id}/unread-count",
    params(("user_id" = String, Path, description = "User to count unread notifications for")),
    responses((status = 200, description = "Unread count")),
    tag = "Notifications"
)]
fn doc_unread_count_handler() {}

#[utoipa::path(
    get,
    path = "/provider/feed/{provider_id}",
    params(("provider_id" = String, Path, description = "Provider whose dashboard feed to read")),
    responses((status = 200, description = "Feed entries, newest first", body = [FeedEntry])),
    tag = "Provider Feed"
)]
fn doc_provider_feed_handler() {}

#[utoipa::path(
    put,
    path = "/provider/feed/{entry_id}/read",
    params(("entry_id" = String, Path, description = "The feed entry to mark read")),
    responses(
        (status = 200, description = "Marked read"),
        (status = 404, description = "Entry unknown or already evicted")
    ),
    tag = "Provider Feed"
)]
fn doc_mark_feed_entry_read_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_register_device_handler,
        doc_unregister_device_handler,
        doc_user_device_tokens_handler,
        doc_user_notifications_handler,
        doc_mark_notification_read_handler,
        doc_mark_all_read_handler,
        doc_unread_count_handler,
        doc_provider_feed_handler,
        doc_mark_feed_entry_read_handler
    ),
    components(schemas(RegisterDeviceRequest, UnregisterDeviceRequest, FeedEntry)),
    tags(
        (name = "Devices", description = "Push device registry"),
        (name = "Notifications", description = "In-app notification API"),
        (name = "Provider Feed", description = "Ephemeral provider dashboard feed")
    )
)]
pub struct NotifyApiDoc;
