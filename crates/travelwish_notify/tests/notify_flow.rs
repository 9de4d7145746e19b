//! Notification fan-out and device-registry scenario tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use travelwish_common::services::{
    BookingSnapshot, BoxFuture, DeliveryStatus, NotificationDispatch, NotificationEvent,
    NotificationKind,
};
use travelwish_db::{
    DbError, DevicePlatform, DeviceToken, DeviceTokenRepository, NewNotification, NewPushDelivery,
    Notification, NotificationRepository, PushDelivery, PushDeliveryRepository, PushStatus,
};
use travelwish_notify::push::{PushError, PushSender};
use travelwish_notify::{
    EmailChannel, FeedChannel, InAppChannel, NotificationDispatcher, NotifyState, ProviderFeed,
    PushChannel,
};

// --- In-memory fakes ---

#[derive(Default)]
struct InMemoryDevices {
    rows: Mutex<Vec<DeviceToken>>,
}

impl InMemoryDevices {
    fn with_token(token: DeviceToken) -> Self {
        let repo = Self::default();
        repo.rows.lock().unwrap().push(token);
        repo
    }
}

impl DeviceTokenRepository for InMemoryDevices {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async { Ok(()) })
    }

    fn register(
        &self,
        user_id: &str,
        token: &str,
        platform: DevicePlatform,
        device_id: &str,
    ) -> BoxFuture<'_, (DeviceToken, bool), DbError> {
        let user_id = user_id.to_string();
        let token = token.to_string();
        let device_id = device_id.to_string();
        Box::pin(async move {
            let mut rows = self.rows.lock().unwrap();
            if let Some(existing) = rows.iter_mut().find(|t| t.token == token) {
                existing.user_id = user_id;
                existing.platform = platform;
                existing.device_id = device_id;
                existing.is_active = true;
                return Ok((existing.clone(), false));
            }
            let stored = DeviceToken {
                id: format!("dev_{}", rows.len() + 1),
                user_id,
                token,
                platform,
                device_id,
                is_active: true,
                last_used: Some("2026-08-27T00:00:00Z".to_string()),
            };
            rows.push(stored.clone());
            Ok((stored, true))
        })
    }

    fn deactivate_by_token(&self, token: &str) -> BoxFuture<'_, bool, DbError> {
        let token = token.to_string();
        Box::pin(async move {
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|t| t.token == token) {
                Some(row) => {
                    row.is_active = false;
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    fn find_active_by_user(&self, user_id: &str) -> BoxFuture<'_, Vec<DeviceToken>, DbError> {
        let user_id = user_id.to_string();
        Box::pin(async move {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.user_id == user_id && t.is_active)
                .cloned()
                .collect())
        })
    }

    fn find_by_user(&self, user_id: &str) -> BoxFuture<'_, Vec<DeviceToken>, DbError> {
        let user_id = user_id.to_string();
        Box::pin(async move {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.user_id == user_id)
                .cloned()
                .collect())
        })
    }
}

#[derive(Default)]
struct InMemoryNotifications {
    rows: Mutex<Vec<Notification>>,
}

impl NotificationRepository for InMemoryNotifications {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async { Ok(()) })
    }

    fn insert(&self, notification: NewNotification) -> BoxFuture<'_, Notification, DbError> {
        Box::pin(async move {
            let mut rows = self.rows.lock().unwrap();
            let stored = Notification {
                id: format!("ntf_{}", rows.len() + 1),
                user_id: notification.user_id,
                kind: notification.kind,
                title: notification.title,
                message: notification.message,
                is_read: false,
                booking_id: notification.booking_id,
                created_at: Some("2026-08-27T00:00:00Z".to_string()),
            };
            rows.push(stored.clone());
            Ok(stored)
        })
    }

    fn find_by_user(&self, user_id: &str) -> BoxFuture<'_, Vec<Notification>, DbError> {
        let user_id = user_id.to_string();
        Box::pin(async move {
            let mut found: Vec<Notification> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|n| n.user_id == user_id)
                .cloned()
                .collect();
            found.reverse();
            Ok(found)
        })
    }

    fn mark_read(&self, notification_id: &str) -> BoxFuture<'_, bool, DbError> {
        let notification_id = notification_id.to_string();
        Box::pin(async move {
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|n| n.id == notification_id) {
                Some(row) => {
                    row.is_read = true;
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    fn mark_all_read(&self, user_id: &str) -> BoxFuture<'_, u64, DbError> {
        let user_id = user_id.to_string();
        Box::pin(async move {
            let mut modified = 0u64;
            for row in self.rows.lock().unwrap().iter_mut() {
                if row.user_id == user_id && !row.is_read {
                    row.is_read = true;
                    modified += 1;
                }
            }
            Ok(modified)
        })
    }

    fn unread_count(&self, user_id: &str) -> BoxFuture<'_, i64, DbError> {
        let user_id = user_id.to_string();
        Box::pin(async move {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|n| n.user_id == user_id && !n.is_read)
                .count() as i64)
        })
    }
}

#[derive(Default)]
struct InMemoryPushDeliveries {
    rows: Mutex<Vec<PushDelivery>>,
}

impl PushDeliveryRepository for InMemoryPushDeliveries {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async { Ok(()) })
    }

    fn record(&self, delivery: NewPushDelivery) -> BoxFuture<'_, PushDelivery, DbError> {
        Box::pin(async move {
            let mut rows = self.rows.lock().unwrap();
            let stored = PushDelivery {
                id: format!("pd_{}", rows.len() + 1),
                user_id: delivery.user_id,
                device_token: delivery.device_token,
                title: delivery.title,
                body: delivery.body,
                status: delivery.status,
                error: delivery.error,
                booking_id: delivery.booking_id,
                created_at: Some("2026-08-27T00:00:00Z".to_string()),
            };
            rows.push(stored.clone());
            Ok(stored)
        })
    }

    fn find_by_user(&self, user_id: &str) -> BoxFuture<'_, Vec<PushDelivery>, DbError> {
        let user_id = user_id.to_string();
        Box::pin(async move {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|d| d.user_id == user_id)
                .cloned()
                .collect())
        })
    }
}

/// Push sender that fails for tokens listed in `failing_tokens`.
#[derive(Default)]
struct FakePushSender {
    failing_tokens: Vec<String>,
    sent: Mutex<Vec<String>>,
}

impl PushSender for FakePushSender {
    fn send_to_token(
        &self,
        token: &str,
        _title: &str,
        _body: &str,
        _data: Option<HashMap<String, String>>,
    ) -> BoxFuture<'_, String, PushError> {
        let token = token.to_string();
        Box::pin(async move {
            if self.failing_tokens.contains(&token) {
                return Err(PushError::ApiError("UNREGISTERED".to_string()));
            }
            self.sent.lock().unwrap().push(token.clone());
            Ok(format!("projects/travelwish/messages/{}", token))
        })
    }
}

// --- Fixtures ---

fn device(user_id: &str, token: &str) -> DeviceToken {
    DeviceToken {
        id: format!("dev_{}", token),
        user_id: user_id.to_string(),
        token: token.to_string(),
        platform: DevicePlatform::Android,
        device_id: format!("hw_{}", token),
        is_active: true,
        last_used: None,
    }
}

fn confirmed_event() -> NotificationEvent {
    NotificationEvent {
        kind: NotificationKind::BookingConfirmed,
        recipient_user_id: "u1".to_string(),
        recipient_email: Some("amara@example.com".to_string()),
        provider_id: None,
        title: "Booking Confirmed!".to_string(),
        message: "Great news! Your booking for Lagoon View Villa has been confirmed.".to_string(),
        booking: BookingSnapshot {
            booking_id: "bk_1".to_string(),
            resource_id: "r1".to_string(),
            resource_name: "Lagoon View Villa".to_string(),
            provider_id: "p1".to_string(),
            customer_user_id: "u1".to_string(),
            customer_name: "Amara Silva".to_string(),
            customer_email: "amara@example.com".to_string(),
            customer_phone: None,
            check_in_date: "2026-09-01".to_string(),
            check_out_date: "2026-09-04".to_string(),
            number_of_guests: 2,
            special_requests: None,
            status: "confirmed".to_string(),
        },
    }
}

fn provider_event() -> NotificationEvent {
    NotificationEvent {
        kind: NotificationKind::NewBooking,
        recipient_user_id: "p1".to_string(),
        recipient_email: Some("host@example.com".to_string()),
        provider_id: Some("p1".to_string()),
        title: "New Booking Request".to_string(),
        message: "Amara Silva requested Lagoon View Villa".to_string(),
        ..confirmed_event()
    }
}

// --- Dispatcher scenarios ---

#[tokio::test]
async fn dispatch_persists_one_in_app_notification_with_matching_kind() {
    let notifications = Arc::new(InMemoryNotifications::default());
    let dispatcher =
        NotificationDispatcher::new(vec![Arc::new(InAppChannel::new(notifications.clone()))]);

    dispatcher.dispatch(confirmed_event()).await.unwrap();

    let stored = notifications.find_by_user("u1").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].kind, NotificationKind::BookingConfirmed);
    assert_eq!(stored[0].booking_id.as_deref(), Some("bk_1"));
    assert!(!stored[0].is_read);
}

#[tokio::test]
async fn feed_channel_skips_customer_events() {
    let feed = Arc::new(ProviderFeed::default());
    let dispatcher = NotificationDispatcher::new(vec![Arc::new(FeedChannel::new(feed.clone()))]);

    let report = dispatcher.dispatch(confirmed_event()).await.unwrap();
    assert_eq!(report.deliveries[0].status, DeliveryStatus::Skipped);
    assert!(feed.is_empty());

    let report = dispatcher.dispatch(provider_event()).await.unwrap();
    assert_eq!(report.deliveries[0].status, DeliveryStatus::Sent);
    assert_eq!(feed.for_provider("p1").len(), 1);
}

#[tokio::test]
async fn unconfigured_email_channel_skips_instead_of_failing() {
    let dispatcher = NotificationDispatcher::new(vec![Arc::new(EmailChannel::new(None))]);

    let report = dispatcher.dispatch(confirmed_event()).await.unwrap();
    assert_eq!(report.deliveries[0].status, DeliveryStatus::Skipped);
    assert_eq!(report.failed_channels().count(), 0);
}

#[tokio::test]
async fn push_records_a_delivery_row_per_token() {
    let devices = Arc::new(InMemoryDevices::default());
    devices.rows.lock().unwrap().push(device("u1", "tok_a"));
    devices.rows.lock().unwrap().push(device("u1", "tok_b"));
    let deliveries = Arc::new(InMemoryPushDeliveries::default());
    let sender = Arc::new(FakePushSender {
        failing_tokens: vec!["tok_b".to_string()],
        ..Default::default()
    });

    let channel = PushChannel::new(Some(sender.clone()), devices, deliveries.clone());
    let dispatcher = NotificationDispatcher::new(vec![Arc::new(channel)]);

    let report = dispatcher.dispatch(confirmed_event()).await.unwrap();
    // One token delivered, so the channel still counts as sent
    assert_eq!(report.deliveries[0].status, DeliveryStatus::Sent);

    let rows = deliveries.find_by_user("u1").await.unwrap();
    assert_eq!(rows.len(), 2);
    let sent = rows.iter().find(|r| r.device_token == "tok_a").unwrap();
    assert_eq!(sent.status, PushStatus::Sent);
    let failed = rows.iter().find(|r| r.device_token == "tok_b").unwrap();
    assert_eq!(failed.status, PushStatus::Failed);
    assert!(failed.error.as_deref().unwrap().contains("UNREGISTERED"));
}

#[tokio::test]
async fn push_skips_users_without_devices() {
    let devices = Arc::new(InMemoryDevices::default());
    let deliveries = Arc::new(InMemoryPushDeliveries::default());
    let sender = Arc::new(FakePushSender::default());

    let channel = PushChannel::new(Some(sender), devices, deliveries.clone());
    let dispatcher = NotificationDispatcher::new(vec![Arc::new(channel)]);

    let report = dispatcher.dispatch(confirmed_event()).await.unwrap();
    assert_eq!(report.deliveries[0].status, DeliveryStatus::Skipped);
    assert!(deliveries.rows.lock().unwrap().is_empty());
}

// --- HTTP surface ---

fn app(state: Arc<NotifyState>) -> axum::Router {
    travelwish_notify::routes(state)
}

fn test_state() -> Arc<NotifyState> {
    Arc::new(NotifyState {
        devices: Arc::new(InMemoryDevices::with_token(device("u1", "tok_a"))),
        notifications: Arc::new(InMemoryNotifications::default()),
        feed: Arc::new(ProviderFeed::default()),
    })
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn registering_a_new_token_returns_201_and_reassigning_200() {
    let router = app(test_state());

    let new_body = serde_json::json!({
        "user_id": "u2",
        "token": "tok_new",
        "platform": "ios",
        "device_id": "iphone-16"
    });
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/device-token/register")
                .header("content-type", "application/json")
                .body(Body::from(new_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Existing token handed to another account
    let reassign_body = serde_json::json!({
        "user_id": "u2",
        "token": "tok_a",
        "platform": "android",
        "device_id": "pixel-8"
    });
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/device-token/register")
                .header("content-type", "application/json")
                .body(Body::from(reassign_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["created"], false);
}

#[tokio::test]
async fn unsupported_platform_is_rejected() {
    let body = serde_json::json!({
        "user_id": "u1",
        "token": "tok_x",
        "platform": "web",
        "device_id": "browser"
    });
    let response = app(test_state())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/device-token/register")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let envelope = body_json(response).await;
    assert_eq!(envelope["success"], false);
}

#[tokio::test]
async fn unregistering_an_unknown_token_is_404() {
    let body = serde_json::json!({ "token": "tok_missing" });
    let response = app(test_state())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/device-token/unregister")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn notification_read_flow_over_http() {
    let state = test_state();
    state
        .notifications
        .insert(NewNotification {
            user_id: "u1".to_string(),
            kind: NotificationKind::BookingConfirmed,
            title: "Booking Confirmed!".to_string(),
            message: "Your stay is confirmed".to_string(),
            booking_id: Some("bk_1".to_string()),
        })
        .await
        .unwrap();
    let router = app(state);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/notifications/u1/unread-count")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["unread_count"], 1);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/notifications/ntf_1/read")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/notifications/u1/unread-count")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["unread_count"], 0);
}

#[tokio::test]
async fn provider_feed_roundtrip_over_http() {
    let state = test_state();
    let entry = state.feed.push("p1", &provider_event());
    let router = app(state);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/provider/feed/p1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["feed"][0]["is_read"], false);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/provider/feed/{}/read", entry.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/provider/feed/missing/read")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
