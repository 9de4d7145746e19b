// --- File: crates/travelwish_bookings/src/handlers.rs ---
//! HTTP handlers for the booking lifecycle.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

use crate::error::BookingError;
use crate::logic::{
    create_booking, customer_bookings, get_booking, provider_pending_bookings,
    update_booking_status, CreateBookingRequest, UpdateStatusRequest,
};
use travelwish_common::error::TravelWishError;
use travelwish_db::{BookingRepository, ResourceDirectory};

/// Shared state for booking handlers.
#[derive(Clone)]
pub struct BookingState {
    pub bookings: Arc<dyn BookingRepository>,
    pub resources: Arc<dyn ResourceDirectory>,
    pub dispatcher: Arc<dyn travelwish_common::services::NotificationDispatch>,
}

fn error_response(err: BookingError) -> Response {
    error!("Booking operation failed: {}", err);
    TravelWishError::from(err).into_response()
}

#[axum::debug_handler]
pub async fn create_booking_handler(
    State(state): State<Arc<BookingState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Response {
    debug!("Creating booking for resource: {:?}", payload.resource_id);

    match create_booking(
        state.bookings.as_ref(),
        state.resources.as_ref(),
        state.dispatcher.as_ref(),
        payload,
    )
    .await
    {
        Ok(booking) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "booking_id": booking.id,
                "status": booking.status.as_str(),
                "message": "Booking request submitted",
            })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

#[axum::debug_handler]
pub async fn update_booking_status_handler(
    State(state): State<Arc<BookingState>>,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Response {
    debug!(booking_id = %booking_id, status = %payload.status, "Updating booking status");

    match update_booking_status(
        state.bookings.as_ref(),
        state.dispatcher.as_ref(),
        &booking_id,
        payload,
    )
    .await
    {
        Ok(booking) => Json(json!({
            "success": true,
            "booking_id": booking.id,
            "status": booking.status.as_str(),
        }))
        .into_response(),
        Err(err) => error_response(err),
    }
}

#[axum::debug_handler]
pub async fn get_booking_status_handler(
    State(state): State<Arc<BookingState>>,
    Path(booking_id): Path<String>,
) -> Response {
    match get_booking(state.bookings.as_ref(), &booking_id).await {
        Ok(booking) => Json(json!({
            "success": true,
            "booking_id": booking.id,
            "status": booking.status.as_str(),
        }))
        .into_response(),
        Err(err) => error_response(err),
    }
}

#[axum::debug_handler]
pub async fn provider_bookings_handler(
    State(state): State<Arc<BookingState>>,
    Path(provider_id): Path<String>,
) -> Response {
    match provider_pending_bookings(state.bookings.as_ref(), &provider_id).await {
        Ok(bookings) => Json(json!({
            "success": true,
            "count": bookings.len(),
            "bookings": bookings,
        }))
        .into_response(),
        Err(err) => error_response(err),
    }
}

#[axum::debug_handler]
pub async fn user_bookings_handler(
    State(state): State<Arc<BookingState>>,
    Path(user_id): Path<String>,
) -> Response {
    match customer_bookings(state.bookings.as_ref(), &user_id).await {
        Ok(bookings) => Json(json!({
            "success": true,
            "count": bookings.len(),
            "bookings": bookings,
        }))
        .into_response(),
        Err(err) => error_response(err),
    }
}
