// --- File: crates/travelwish_bookings/src/logic.rs ---
//! Booking lifecycle logic.
//!
//! Status changes go through an explicit transition table checked against the
//! booking's **current** stored status; everything outside the table is a
//! validation error and leaves the stored status untouched. Notification
//! fan-out is best-effort: dispatch failures are logged and never surface to
//! the booking operation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{info, warn};

use crate::error::BookingError;
use travelwish_common::services::{
    BookingSnapshot, NotificationDispatch, NotificationEvent, NotificationKind,
};
use travelwish_db::{
    Booking, BookingRepository, BookingStatus, NewBooking, ResourceDirectory, ResourceSummary,
};

// --- Data Structures ---

/// Request from the client app to create a booking.
#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateBookingRequest {
    pub resource_id: Option<String>,
    pub customer_user_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "2026-09-01"))]
    pub check_in_date: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "2026-09-04"))]
    pub check_out_date: Option<String>,
    pub number_of_guests: Option<i64>,
    pub room_type: Option<String>,
    pub price_per_night: Option<f64>,
    pub total_price: Option<f64>,
    pub special_requests: Option<String>,
}

/// Request body for the status-update endpoint.
#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateStatusRequest {
    #[cfg_attr(feature = "openapi", schema(example = "confirmed"))]
    pub status: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateBookingResponse {
    pub success: bool,
    pub booking_id: String,
    pub status: String,
    pub message: String,
}

// --- Transition Table ---

/// The booking lifecycle transition table. Anything not listed here is
/// rejected.
pub fn is_valid_transition(from: BookingStatus, to: BookingStatus) -> bool {
    use BookingStatus::*;
    matches!(
        (from, to),
        (Pending, Confirmed)
            | (Pending, Rejected)
            | (Pending, Cancelled)
            | (Confirmed, Cancelled)
            | (Confirmed, Completed)
    )
}

// --- Core Logic Functions ---

fn parse_booking_date(field: &str, value: &str) -> Result<NaiveDate, BookingError> {
    // Accept plain dates and full RFC 3339 timestamps
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .map_err(|_| BookingError::ValidationError(format!("Invalid {}: {}", field, value)))
}

/// Creates a booking in `pending` status and fires the notification fan-out.
pub async fn create_booking(
    bookings: &dyn BookingRepository,
    resources: &dyn ResourceDirectory,
    dispatcher: &dyn NotificationDispatch,
    request: CreateBookingRequest,
) -> Result<Booking, BookingError> {
    let mut missing = Vec::new();
    if request.resource_id.as_deref().unwrap_or("").is_empty() {
        missing.push("resource_id".to_string());
    }
    if request.customer_user_id.as_deref().unwrap_or("").is_empty() {
        missing.push("customer_user_id".to_string());
    }
    if request.customer_name.as_deref().unwrap_or("").is_empty() {
        missing.push("customer_name".to_string());
    }
    if request.customer_email.as_deref().unwrap_or("").is_empty() {
        missing.push("customer_email".to_string());
    }
    if request.check_in_date.as_deref().unwrap_or("").is_empty() {
        missing.push("check_in_date".to_string());
    }
    if request.check_out_date.as_deref().unwrap_or("").is_empty() {
        missing.push("check_out_date".to_string());
    }
    if !missing.is_empty() {
        return Err(BookingError::MissingFields(missing));
    }

    let check_in_text = request.check_in_date.clone().unwrap_or_default();
    let check_out_text = request.check_out_date.clone().unwrap_or_default();

    let check_in = parse_booking_date("check_in_date", &check_in_text)?;
    let check_out = parse_booking_date("check_out_date", &check_out_text)?;
    if check_out <= check_in {
        return Err(BookingError::ValidationError(
            "check_out_date must be after check_in_date".to_string(),
        ));
    }

    let number_of_guests = request.number_of_guests.unwrap_or(1);
    if number_of_guests < 1 {
        return Err(BookingError::ValidationError(
            "number_of_guests must be at least 1".to_string(),
        ));
    }

    // These unwraps were validated above
    let resource_id = request.resource_id.unwrap_or_default();
    let resource = resources
        .find_by_id(&resource_id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Resource not found: {}", resource_id)))?;

    let booking = bookings
        .create(NewBooking {
            resource_id: resource.id.clone(),
            resource_name: resource.name.clone(),
            provider_id: resource.provider_id.clone(),
            customer_user_id: request.customer_user_id.unwrap_or_default(),
            customer_name: request.customer_name.unwrap_or_default(),
            customer_email: request.customer_email.unwrap_or_default(),
            customer_phone: request.customer_phone,
            check_in_date: check_in_text,
            check_out_date: check_out_text,
            number_of_guests,
            room_type: request.room_type,
            price_per_night: request.price_per_night.unwrap_or(0.0),
            total_price: request.total_price.unwrap_or(0.0),
            special_requests: request.special_requests,
        })
        .await?;

    info!(booking_id = %booking.id, resource = %booking.resource_name, "Booking created");

    dispatch_logged(dispatcher, customer_submitted_event(&booking)).await;
    dispatch_logged(dispatcher, provider_new_booking_event(&booking, &resource)).await;

    Ok(booking)
}

/// Applies a status change through the transition table and notifies the
/// customer.
pub async fn update_booking_status(
    bookings: &dyn BookingRepository,
    dispatcher: &dyn NotificationDispatch,
    booking_id: &str,
    request: UpdateStatusRequest,
) -> Result<Booking, BookingError> {
    let new_status = BookingStatus::from_str(&request.status)
        .map_err(BookingError::ValidationError)?;

    let booking = bookings
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Booking not found: {}", booking_id)))?;

    if !is_valid_transition(booking.status, new_status) {
        return Err(BookingError::InvalidTransition {
            from: booking.status.to_string(),
            to: new_status.to_string(),
        });
    }

    let updated = bookings
        .update_status(booking_id, new_status)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Booking not found: {}", booking_id)))?;

    info!(booking_id = %updated.id, status = %updated.status, "Booking status updated");

    dispatch_logged(dispatcher, status_change_event(&updated, new_status)).await;

    Ok(updated)
}

pub async fn get_booking(
    bookings: &dyn BookingRepository,
    booking_id: &str,
) -> Result<Booking, BookingError> {
    bookings
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Booking not found: {}", booking_id)))
}

pub async fn provider_pending_bookings(
    bookings: &dyn BookingRepository,
    provider_id: &str,
) -> Result<Vec<Booking>, BookingError> {
    Ok(bookings.find_pending_by_provider(provider_id).await?)
}

pub async fn customer_bookings(
    bookings: &dyn BookingRepository,
    user_id: &str,
) -> Result<Vec<Booking>, BookingError> {
    Ok(bookings.find_by_customer(user_id).await?)
}

// --- Notification Events ---

async fn dispatch_logged(dispatcher: &dyn NotificationDispatch, event: NotificationEvent) {
    let kind = event.kind;
    match dispatcher.dispatch(event).await {
        Ok(report) => {
            for failure in report.failed_channels() {
                warn!(
                    channel = failure.channel,
                    kind = kind.as_str(),
                    detail = failure.detail.as_deref().unwrap_or(""),
                    "Notification channel failed"
                );
            }
        }
        Err(e) => warn!(kind = kind.as_str(), error = %e, "Notification dispatch failed"),
    }
}

fn snapshot(booking: &Booking) -> BookingSnapshot {
    BookingSnapshot {
        booking_id: booking.id.clone(),
        resource_id: booking.resource_id.clone(),
        resource_name: booking.resource_name.clone(),
        provider_id: booking.provider_id.clone(),
        customer_user_id: booking.customer_user_id.clone(),
        customer_name: booking.customer_name.clone(),
        customer_email: booking.customer_email.clone(),
        customer_phone: booking.customer_phone.clone(),
        check_in_date: booking.check_in_date.clone(),
        check_out_date: booking.check_out_date.clone(),
        number_of_guests: booking.number_of_guests,
        special_requests: booking.special_requests.clone(),
        status: booking.status.to_string(),
    }
}

/// In-app notice to the customer right after submitting a request.
pub fn customer_submitted_event(booking: &Booking) -> NotificationEvent {
    NotificationEvent {
        kind: NotificationKind::NewBooking,
        recipient_user_id: booking.customer_user_id.clone(),
        recipient_email: None,
        provider_id: None,
        title: "Booking Submitted".to_string(),
        message: format!(
            "Your booking request for {} has been sent to the provider. You'll be notified once it's reviewed.",
            booking.resource_name
        ),
        booking: snapshot(booking),
    }
}

/// Provider-facing fan-out for a new booking request (feed, email, push).
pub fn provider_new_booking_event(
    booking: &Booking,
    resource: &ResourceSummary,
) -> NotificationEvent {
    NotificationEvent {
        kind: NotificationKind::NewBooking,
        recipient_user_id: booking.provider_id.clone(),
        recipient_email: resource.provider_email.clone(),
        provider_id: Some(booking.provider_id.clone()),
        title: "New Booking Request".to_string(),
        message: format!(
            "{} requested {} from {} to {} for {} guest(s).",
            booking.customer_name,
            booking.resource_name,
            booking.check_in_date,
            booking.check_out_date,
            booking.number_of_guests
        ),
        booking: snapshot(booking),
    }
}

/// Customer-facing notification for a status change. Exactly one per update;
/// the kind mirrors the new status.
pub fn status_change_event(booking: &Booking, new_status: BookingStatus) -> NotificationEvent {
    let (kind, title, message) = match new_status {
        BookingStatus::Confirmed => (
            NotificationKind::BookingConfirmed,
            "Booking Confirmed".to_string(),
            format!(
                "Great news! Your booking for {} has been confirmed. Check-in: {}, Check-out: {}.",
                booking.resource_name, booking.check_in_date, booking.check_out_date
            ),
        ),
        BookingStatus::Rejected => (
            NotificationKind::BookingRejected,
            "Booking Update".to_string(),
            format!(
                "Unfortunately, your booking for {} from {} to {} could not be accepted. Please try different dates.",
                booking.resource_name, booking.check_in_date, booking.check_out_date
            ),
        ),
        BookingStatus::Cancelled => (
            NotificationKind::BookingCancelled,
            "Booking Cancelled".to_string(),
            format!(
                "Your booking for {} from {} to {} has been cancelled.",
                booking.resource_name, booking.check_in_date, booking.check_out_date
            ),
        ),
        BookingStatus::Completed => (
            NotificationKind::BookingCompleted,
            "Booking Completed".to_string(),
            format!(
                "Your stay at {} is complete. Thank you for booking with TravelWish!",
                booking.resource_name
            ),
        ),
        // `pending` is never a transition target
        BookingStatus::Pending => (
            NotificationKind::NewBooking,
            "Booking Update".to_string(),
            format!("Your booking for {} was updated.", booking.resource_name),
        ),
    };

    NotificationEvent {
        kind,
        recipient_user_id: booking.customer_user_id.clone(),
        recipient_email: Some(booking.customer_email.clone()),
        provider_id: None,
        title,
        message,
        booking: snapshot(booking),
    }
}
