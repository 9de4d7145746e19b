//! Repository for bookings
//!
//! Bookings are never deleted; their status only changes through the
//! status-update operation, which enforces the lifecycle transition table
//! before calling [`BookingRepository::update_status`].

use crate::error::DbError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use travelwish_common::services::BoxFuture;

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Rejected,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "rejected" => Ok(BookingStatus::Rejected),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(format!("Unknown booking status: {}", other)),
        }
    }
}

/// A stored booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub resource_id: String,
    pub resource_name: String,
    pub provider_id: String,
    pub customer_user_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    /// RFC 3339 date text.
    pub check_in_date: String,
    pub check_out_date: String,
    pub number_of_guests: i64,
    pub room_type: Option<String>,
    pub price_per_night: f64,
    pub total_price: f64,
    pub status: BookingStatus,
    pub special_requests: Option<String>,
    pub created_at: Option<String>,
}

/// Fields required to create a booking. The id, the `pending` status and the
/// creation timestamp are assigned by the repository.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub resource_id: String,
    pub resource_name: String,
    pub provider_id: String,
    pub customer_user_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub check_in_date: String,
    pub check_out_date: String,
    pub number_of_guests: i64,
    pub room_type: Option<String>,
    pub price_per_night: f64,
    pub total_price: f64,
    pub special_requests: Option<String>,
}

/// Repository for bookings.
pub trait BookingRepository: Send + Sync {
    /// Create the bookings table if it doesn't already exist.
    fn init_schema(&self) -> BoxFuture<'_, (), DbError>;

    /// Persist a new booking with `pending` status.
    fn create(&self, booking: NewBooking) -> BoxFuture<'_, Booking, DbError>;

    fn find_by_id(&self, booking_id: &str) -> BoxFuture<'_, Option<Booking>, DbError>;

    /// Set the stored status, returning the updated booking. Returns `None`
    /// when the booking does not exist.
    fn update_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
    ) -> BoxFuture<'_, Option<Booking>, DbError>;

    /// Pending bookings for a provider, newest first.
    fn find_pending_by_provider(&self, provider_id: &str) -> BoxFuture<'_, Vec<Booking>, DbError>;

    /// All bookings placed by a customer, newest first.
    fn find_by_customer(&self, user_id: &str) -> BoxFuture<'_, Vec<Booking>, DbError>;
}
