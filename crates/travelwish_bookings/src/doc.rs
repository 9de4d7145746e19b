// --- File: crates/travelwish_bookings/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{CreateBookingRequest, CreateBookingResponse, UpdateStatusRequest};

#[utoipa::path(
    post,
    path = "/bookings", // Path relative to /api
    request_body(content = CreateBookingRequest, example = json!({
        "resource_id": "lst_9f2c",
        "customer_user_id": "usr_a41",
        "customer_name": "Amara Silva",
        "customer_email": "amara@example.com",
        "check_in_date": "2026-09-01",
        "check_out_date": "2026-09-04",
        "number_of_guests": 2,
        "total_price": 24000.0
    })),
    responses(
        (status = 201, description = "Booking created in pending status", body = CreateBookingResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "Resource not found")
    ),
    tag = "Bookings"
)]
fn doc_create_booking_handler() {}

#[utoipa::path(
    put,
    path = "/bookings/{booking_id}/status",
    params(("booking_id" = String, Path, description = "The booking to update")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Unknown status or transition not allowed"),
        (status = 404, description = "Booking not found")
    ),
    tag = "Bookings"
)]
fn doc_update_booking_status_handler() {}

#[utoipa::path(
    get,
    path = "/bookings/{booking_id}/status",
    params(("booking_id" = String, Path, description = "The booking to inspect")),
    responses(
        (status = 200, description = "Current booking status"),
        (status = 404, description = "Booking not found")
    ),
    tag = "Bookings"
)]
fn doc_get_booking_status_handler() {}

#[utoipa::path(
    get,
    path = "/provider/bookings/{provider_id}",
    params(("provider_id" = String, Path, description = "Provider whose pending bookings to list")),
    responses((status = 200, description = "Pending bookings for the provider")),
    tag = "Bookings"
)]
fn doc_provider_bookings_handler() {}

#[utoipa::path(
    get,
    path = "/users/{user_id}/bookings",
    params(("user_id" = String, Path, description = "Customer whose bookings to list")),
    responses((status = 200, description = "The customer's bookings, newest first")),
    tag = "Bookings"
)]
fn doc_user_bookings_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_create_booking_handler,
        doc_update_booking_status_handler,
        doc_get_booking_status_handler,
        doc_provider_bookings_handler,
        doc_user_bookings_handler
    ),
    components(schemas(CreateBookingRequest, CreateBookingResponse, UpdateStatusRequest)),
    tags((name = "Bookings", description = "Booking lifecycle API"))
)]
pub struct BookingApiDoc;
