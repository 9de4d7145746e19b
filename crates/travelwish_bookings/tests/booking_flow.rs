//! Booking lifecycle scenario tests against in-memory repositories.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use travelwish_bookings::handlers::BookingState;
use travelwish_bookings::logic::{
    create_booking, update_booking_status, CreateBookingRequest, UpdateStatusRequest,
};
use travelwish_bookings::BookingError;
use travelwish_common::services::{
    BoxFuture, BoxedError, DispatchReport, NotificationDispatch, NotificationEvent,
    NotificationKind,
};
use travelwish_db::{
    Booking, BookingRepository, BookingStatus, DbError, NewBooking, ResourceDirectory,
    ResourceSummary,
};

// --- In-memory fakes ---

#[derive(Default)]
struct InMemoryBookings {
    rows: Mutex<Vec<Booking>>,
}

impl BookingRepository for InMemoryBookings {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async { Ok(()) })
    }

    fn create(&self, booking: NewBooking) -> BoxFuture<'_, Booking, DbError> {
        Box::pin(async move {
            let stored = Booking {
                id: format!("bk_{}", self.rows.lock().unwrap().len() + 1),
                resource_id: booking.resource_id,
                resource_name: booking.resource_name,
                provider_id: booking.provider_id,
                customer_user_id: booking.customer_user_id,
                customer_name: booking.customer_name,
                customer_email: booking.customer_email,
                customer_phone: booking.customer_phone,
                check_in_date: booking.check_in_date,
                check_out_date: booking.check_out_date,
                number_of_guests: booking.number_of_guests,
                room_type: booking.room_type,
                price_per_night: booking.price_per_night,
                total_price: booking.total_price,
                status: BookingStatus::Pending,
                special_requests: booking.special_requests,
                created_at: Some("2026-08-27T00:00:00Z".to_string()),
            };
            self.rows.lock().unwrap().push(stored.clone());
            Ok(stored)
        })
    }

    fn find_by_id(&self, booking_id: &str) -> BoxFuture<'_, Option<Booking>, DbError> {
        let booking_id = booking_id.to_string();
        Box::pin(async move {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|b| b.id == booking_id)
                .cloned())
        })
    }

    fn update_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
    ) -> BoxFuture<'_, Option<Booking>, DbError> {
        let booking_id = booking_id.to_string();
        Box::pin(async move {
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|b| b.id == booking_id) {
                Some(b) => {
                    b.status = status;
                    Ok(Some(b.clone()))
                }
                None => Ok(None),
            }
        })
    }

    fn find_pending_by_provider(&self, provider_id: &str) -> BoxFuture<'_, Vec<Booking>, DbError> {
        let provider_id = provider_id.to_string();
        Box::pin(async move {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|b| b.provider_id == provider_id && b.status == BookingStatus::Pending)
                .cloned()
                .collect())
        })
    }

    fn find_by_customer(&self, user_id: &str) -> BoxFuture<'_, Vec<Booking>, DbError> {
        let user_id = user_id.to_string();
        Box::pin(async move {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|b| b.customer_user_id == user_id)
                .cloned()
                .collect())
        })
    }
}

#[derive(Default)]
struct InMemoryResources {
    rows: Mutex<HashMap<String, ResourceSummary>>,
}

impl InMemoryResources {
    fn with_resource(resource: ResourceSummary) -> Self {
        let repo = Self::default();
        repo.rows
            .lock()
            .unwrap()
            .insert(resource.id.clone(), resource);
        repo
    }
}

impl ResourceDirectory for InMemoryResources {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async { Ok(()) })
    }

    fn find_by_id(&self, resource_id: &str) -> BoxFuture<'_, Option<ResourceSummary>, DbError> {
        let resource_id = resource_id.to_string();
        Box::pin(async move { Ok(self.rows.lock().unwrap().get(&resource_id).cloned()) })
    }
}

/// Records dispatched events; optionally reports one channel as failed to
/// prove failures never surface.
#[derive(Default)]
struct RecordingDispatcher {
    events: Mutex<Vec<NotificationEvent>>,
    fail_one_channel: bool,
}

impl NotificationDispatch for RecordingDispatcher {
    fn dispatch(&self, event: NotificationEvent) -> BoxFuture<'_, DispatchReport, BoxedError> {
        Box::pin(async move {
            self.events.lock().unwrap().push(event);
            let mut report = DispatchReport::default();
            report.record(
                "in_app",
                travelwish_common::services::DeliveryStatus::Sent,
                None,
            );
            if self.fail_one_channel {
                report.record(
                    "email",
                    travelwish_common::services::DeliveryStatus::Failed,
                    Some("relay unreachable".to_string()),
                );
            }
            Ok(report)
        })
    }
}

fn villa() -> ResourceSummary {
    ResourceSummary {
        id: "r1".to_string(),
        name: "Lagoon View Villa".to_string(),
        provider_id: "p1".to_string(),
        provider_email: Some("host@example.com".to_string()),
    }
}

fn request() -> CreateBookingRequest {
    CreateBookingRequest {
        resource_id: Some("r1".to_string()),
        customer_user_id: Some("u1".to_string()),
        customer_name: Some("Amara Silva".to_string()),
        customer_email: Some("amara@example.com".to_string()),
        customer_phone: None,
        check_in_date: Some("2026-09-01".to_string()),
        check_out_date: Some("2026-09-04".to_string()),
        number_of_guests: Some(2),
        room_type: None,
        price_per_night: Some(8000.0),
        total_price: Some(24000.0),
        special_requests: None,
    }
}

#[tokio::test]
async fn booking_flow_pending_to_confirmed_notifies_with_dates() {
    let bookings = InMemoryBookings::default();
    let resources = InMemoryResources::with_resource(villa());
    let dispatcher = RecordingDispatcher::default();

    let booking = create_booking(&bookings, &resources, &dispatcher, request())
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);

    // Submission fans out to customer and provider
    assert_eq!(dispatcher.events.lock().unwrap().len(), 2);

    let updated = update_booking_status(
        &bookings,
        &dispatcher,
        &booking.id,
        UpdateStatusRequest {
            status: "confirmed".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.status, BookingStatus::Confirmed);

    let events = dispatcher.events.lock().unwrap();
    assert_eq!(events.len(), 3);
    let confirmation = &events[2];
    assert_eq!(confirmation.kind, NotificationKind::BookingConfirmed);
    assert_eq!(confirmation.recipient_user_id, "u1");
    assert!(confirmation.message.contains("2026-09-01"));
    assert!(confirmation.message.contains("2026-09-04"));
}

#[tokio::test]
async fn illegal_transition_is_rejected_and_status_unchanged() {
    let bookings = InMemoryBookings::default();
    let resources = InMemoryResources::with_resource(villa());
    let dispatcher = RecordingDispatcher::default();

    let booking = create_booking(&bookings, &resources, &dispatcher, request())
        .await
        .unwrap();

    // pending -> completed is not in the table
    let err = update_booking_status(
        &bookings,
        &dispatcher,
        &booking.id,
        UpdateStatusRequest {
            status: "completed".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BookingError::InvalidTransition { .. }));

    let stored = bookings.find_by_id(&booking.id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookingStatus::Pending);
    // No status notification was sent for the rejected update
    assert_eq!(dispatcher.events.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn terminal_booking_cannot_be_revived() {
    let bookings = InMemoryBookings::default();
    let resources = InMemoryResources::with_resource(villa());
    let dispatcher = RecordingDispatcher::default();

    let booking = create_booking(&bookings, &resources, &dispatcher, request())
        .await
        .unwrap();
    update_booking_status(
        &bookings,
        &dispatcher,
        &booking.id,
        UpdateStatusRequest {
            status: "rejected".to_string(),
        },
    )
    .await
    .unwrap();

    let err = update_booking_status(
        &bookings,
        &dispatcher,
        &booking.id,
        UpdateStatusRequest {
            status: "confirmed".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BookingError::InvalidTransition { .. }));
}

#[tokio::test]
async fn unknown_status_string_is_a_validation_error() {
    let bookings = InMemoryBookings::default();
    let resources = InMemoryResources::with_resource(villa());
    let dispatcher = RecordingDispatcher::default();

    let booking = create_booking(&bookings, &resources, &dispatcher, request())
        .await
        .unwrap();

    let err = update_booking_status(
        &bookings,
        &dispatcher,
        &booking.id,
        UpdateStatusRequest {
            status: "archived".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BookingError::ValidationError(_)));
}

#[tokio::test]
async fn missing_resource_creates_nothing() {
    let bookings = InMemoryBookings::default();
    let resources = InMemoryResources::default();
    let dispatcher = RecordingDispatcher::default();

    let err = create_booking(&bookings, &resources, &dispatcher, request())
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::NotFound(_)));
    assert!(bookings.rows.lock().unwrap().is_empty());
    assert!(dispatcher.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_fields_are_all_reported() {
    let bookings = InMemoryBookings::default();
    let resources = InMemoryResources::with_resource(villa());
    let dispatcher = RecordingDispatcher::default();

    let mut req = request();
    req.customer_name = None;
    req.customer_email = Some(String::new());

    let err = create_booking(&bookings, &resources, &dispatcher, req)
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("customer_name"));
    assert!(message.contains("customer_email"));
}

#[tokio::test]
async fn channel_failure_does_not_block_the_update() {
    let bookings = InMemoryBookings::default();
    let resources = InMemoryResources::with_resource(villa());
    let dispatcher = RecordingDispatcher {
        fail_one_channel: true,
        ..Default::default()
    };

    let booking = create_booking(&bookings, &resources, &dispatcher, request())
        .await
        .unwrap();

    let updated = update_booking_status(
        &bookings,
        &dispatcher,
        &booking.id,
        UpdateStatusRequest {
            status: "confirmed".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn http_create_and_status_roundtrip() {
    let state = Arc::new(BookingState {
        bookings: Arc::new(InMemoryBookings::default()),
        resources: Arc::new(InMemoryResources::with_resource(villa())),
        dispatcher: Arc::new(RecordingDispatcher::default()),
    });
    let app = travelwish_bookings::routes(state);

    let body = serde_json::json!({
        "resource_id": "r1",
        "customer_user_id": "u1",
        "customer_name": "Amara Silva",
        "customer_email": "amara@example.com",
        "check_in_date": "2026-09-01",
        "check_out_date": "2026-09-04",
        "number_of_guests": 2
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/bookings")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let created: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(created["success"], true);
    let booking_id = created["booking_id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/bookings/{}/status", booking_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let status: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(status["status"], "pending");
}
