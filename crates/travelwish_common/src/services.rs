// --- File: crates/travelwish_common/src/services.rs ---
//! Service abstractions shared across feature crates.
//!
//! The traits here are object safe on purpose: handler state holds
//! `Arc<dyn ...>` so tests can swap in in-memory fakes without generics
//! leaking through the router types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// A boxed future that resolves to a `Result`.
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A boxed error that can be sent between threads.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

// ---------------------------------------------------------------------------
// Payment gateway
// ---------------------------------------------------------------------------

/// Errors surfaced by a card-payment gateway adapter.
///
/// The adapter classifies raw gateway responses into these variants so the
/// orchestration layer never inspects gateway message strings itself.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Card declined: {0}")]
    CardDeclined(String),

    #[error("Payment method not found: {0}")]
    PaymentMethodNotFound(String),

    #[error("Payment method not attached to customer: {0}")]
    PaymentMethodNotAttached(String),

    /// Any other gateway API error (HTTP status plus gateway message).
    #[error("Gateway API error (Status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    #[error("HTTP request to gateway failed: {0}")]
    RequestError(String),

    #[error("Failed to parse gateway response: {0}")]
    ParseError(String),

    #[error("Gateway configuration missing or incomplete")]
    ConfigError,
}

/// Parameters for creating a payment intent at the gateway.
///
/// `amount_minor` is in the currency's minor unit (cents); conversion from
/// major units happens in the orchestration layer, never here.
#[derive(Debug, Clone, Default)]
pub struct CreateIntentParams {
    pub amount_minor: i64,
    pub currency: String,
    pub customer_id: Option<String>,
    pub payment_method_id: Option<String>,
    /// Confirm the intent in the same call (saved-card flow).
    pub confirm: bool,
    /// Use manual confirmation mode so a 3DS challenge surfaces as
    /// `requires_action` instead of an opaque failure.
    pub manual_confirmation: bool,
    /// Let the gateway pick eligible payment methods (new-card flow).
    pub automatic_payment_methods: bool,
    pub metadata: HashMap<String, String>,
}

/// A payment intent as reported by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Unix seconds.
    #[serde(default)]
    pub created: Option<i64>,
}

/// A customer record at the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayCustomer {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Card details carried on a gateway payment method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDetails {
    #[serde(default)]
    pub brand: Option<String>,
    pub last4: String,
    pub exp_month: u32,
    pub exp_year: u32,
}

/// A tokenized payment method at the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayPaymentMethod {
    pub id: String,
    /// Customer the method is attached to, if any.
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub card: Option<CardDetails>,
}

/// Object-safe abstraction over the card-payment gateway.
///
/// The production implementation talks to the gateway's REST API; tests use
/// an in-memory fake with call counters.
pub trait PaymentGatewayService: Send + Sync {
    fn create_payment_intent(
        &self,
        params: CreateIntentParams,
    ) -> BoxFuture<'_, PaymentIntent, GatewayError>;

    fn retrieve_payment_intent(&self, intent_id: &str)
        -> BoxFuture<'_, PaymentIntent, GatewayError>;

    /// Confirms a previously created intent (manual confirmation flow).
    fn confirm_payment_intent(
        &self,
        intent_id: &str,
    ) -> BoxFuture<'_, PaymentIntent, GatewayError>;

    fn create_customer(
        &self,
        email: &str,
        name: &str,
        metadata: HashMap<String, String>,
    ) -> BoxFuture<'_, GatewayCustomer, GatewayError>;

    fn retrieve_payment_method(
        &self,
        payment_method_id: &str,
    ) -> BoxFuture<'_, GatewayPaymentMethod, GatewayError>;

    fn attach_payment_method(
        &self,
        payment_method_id: &str,
        customer_id: &str,
    ) -> BoxFuture<'_, GatewayPaymentMethod, GatewayError>;

    /// Lists recent payment intents for a gateway customer, newest first.
    fn list_payment_intents(
        &self,
        customer_id: &str,
        limit: u8,
    ) -> BoxFuture<'_, Vec<PaymentIntent>, GatewayError>;
}

// ---------------------------------------------------------------------------
// Notification dispatch
// ---------------------------------------------------------------------------

/// The booking lifecycle events that trigger notification fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewBooking,
    BookingConfirmed,
    BookingRejected,
    BookingCancelled,
    BookingCompleted,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::NewBooking => "new_booking",
            NotificationKind::BookingConfirmed => "booking_confirmed",
            NotificationKind::BookingRejected => "booking_rejected",
            NotificationKind::BookingCancelled => "booking_cancelled",
            NotificationKind::BookingCompleted => "booking_completed",
        }
    }
}

/// Everything a channel needs to render a booking notification without
/// going back to the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSnapshot {
    pub booking_id: String,
    pub resource_id: String,
    pub resource_name: String,
    pub provider_id: String,
    pub customer_user_id: String,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub check_in_date: String,
    pub check_out_date: String,
    pub number_of_guests: i64,
    #[serde(default)]
    pub special_requests: Option<String>,
    pub status: String,
}

/// A single notification to fan out across channels.
#[derive(Debug, Clone)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    /// User who receives the in-app record and push notification.
    pub recipient_user_id: String,
    /// Recipient for the email channel, when available.
    pub recipient_email: Option<String>,
    /// Set when the event should also appear in a provider's dashboard feed.
    pub provider_id: Option<String>,
    pub title: String,
    pub message: String,
    pub booking: BookingSnapshot,
}

/// Outcome of one channel's delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Sent,
    Failed,
    /// Channel not configured or not applicable to this event.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct ChannelDelivery {
    pub channel: &'static str,
    pub status: DeliveryStatus,
    pub detail: Option<String>,
}

/// Per-channel results of a dispatch. Failures are recorded, never raised.
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub deliveries: Vec<ChannelDelivery>,
}

impl DispatchReport {
    pub fn record(&mut self, channel: &'static str, status: DeliveryStatus, detail: Option<String>) {
        self.deliveries.push(ChannelDelivery {
            channel,
            status,
            detail,
        });
    }

    pub fn failed_channels(&self) -> impl Iterator<Item = &ChannelDelivery> {
        self.deliveries
            .iter()
            .filter(|d| d.status == DeliveryStatus::Failed)
    }
}

/// Object-safe entry point for notification fan-out.
///
/// Implementations must be best-effort: a failing channel is recorded in the
/// report and must never fail the dispatch itself. Callers treat the returned
/// future as infallible apart from task-level panics.
pub trait NotificationDispatch: Send + Sync {
    fn dispatch(&self, event: NotificationEvent) -> BoxFuture<'_, DispatchReport, BoxedError>;
}
