// --- File: crates/travelwish_notify/src/mail.rs ---
//! Mail relay client and booking email rendering.
//!
//! Emails are sent as JSON to a hosted relay endpoint; the relay API key is
//! read from the `MAIL_RELAY_API_KEY` environment variable at send time so it
//! never lives in config files.

use serde::Serialize;
use std::env;
use thiserror::Error;
use tracing::debug;
use travelwish_common::http::client::get_client;
use travelwish_common::services::{BookingSnapshot, NotificationEvent, NotificationKind};
use travelwish_config::MailConfig;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Mail relay configuration missing or incomplete")]
    ConfigError,

    #[error("HTTP request to mail relay failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Mail relay error (Status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },
}

#[derive(Serialize, Debug)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Client for the transactional mail relay.
pub struct MailRelayClient {
    config: MailConfig,
}

impl MailRelayClient {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    fn api_key() -> Result<String, MailError> {
        env::var("MAIL_RELAY_API_KEY").map_err(|_| MailError::ConfigError)
    }

    /// Sends one HTML email through the relay.
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        let api_key = Self::api_key()?;
        let message = RelayMessage {
            from: &self.config.from_address,
            to,
            subject,
            html,
        };

        debug!(to = %to, subject = %subject, "Sending email via relay");
        let response = get_client()
            .post(&self.config.relay_url)
            .bearer_auth(api_key)
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    /// Subject line and HTML body for an event, from the recipient's
    /// perspective: provider events get the dashboard mail, customer events
    /// the status mail.
    pub fn render(&self, event: &NotificationEvent) -> (String, String) {
        match event.kind {
            NotificationKind::NewBooking if event.provider_id.is_some() => (
                format!("New Booking Request - {}", event.booking.resource_name),
                provider_new_booking_html(&event.booking, self.config.dashboard_url.as_deref()),
            ),
            _ => (event.title.clone(), customer_status_html(event)),
        }
    }
}

fn booking_details_rows(booking: &BookingSnapshot) -> String {
    let mut rows = format!(
        "<tr><td><strong>Property</strong></td><td>{}</td></tr>\
         <tr><td><strong>Check-in</strong></td><td>{}</td></tr>\
         <tr><td><strong>Check-out</strong></td><td>{}</td></tr>\
         <tr><td><strong>Guests</strong></td><td>{}</td></tr>",
        booking.resource_name, booking.check_in_date, booking.check_out_date,
        booking.number_of_guests
    );
    if let Some(requests) = &booking.special_requests {
        rows.push_str(&format!(
            "<tr><td><strong>Special requests</strong></td><td>{}</td></tr>",
            requests
        ));
    }
    rows
}

/// The provider-facing "new booking request" email.
fn provider_new_booking_html(booking: &BookingSnapshot, dashboard_url: Option<&str>) -> String {
    let phone = booking.customer_phone.as_deref().unwrap_or("Not provided");
    let dashboard_link = dashboard_url
        .map(|url| {
            format!(
                "<p><a href=\"{}\">Open your dashboard</a> to confirm or reject this request.</p>",
                url
            )
        })
        .unwrap_or_default();

    format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px;\">\
         <h2>New Booking Request</h2>\
         <p>You have received a new booking request for <strong>{}</strong>.</p>\
         <table cellpadding=\"6\">{}\
         <tr><td><strong>Customer</strong></td><td>{}</td></tr>\
         <tr><td><strong>Email</strong></td><td>{}</td></tr>\
         <tr><td><strong>Phone</strong></td><td>{}</td></tr>\
         </table>{}\
         <p>TravelWish</p></div>",
        booking.resource_name,
        booking_details_rows(booking),
        booking.customer_name,
        booking.customer_email,
        phone,
        dashboard_link
    )
}

/// The customer-facing status email for any lifecycle event.
fn customer_status_html(event: &NotificationEvent) -> String {
    format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px;\">\
         <h2>{}</h2>\
         <p>Dear {},</p>\
         <p>{}</p>\
         <table cellpadding=\"6\">{}</table>\
         <p>Thank you for booking with TravelWish.</p></div>",
        event.title,
        event.booking.customer_name,
        event.message,
        booking_details_rows(&event.booking)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> BookingSnapshot {
        BookingSnapshot {
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
            special_requests: Some("Late check-in".to_string()),
            status: "pending".to_string(),
        }
    }

    #[test]
    fn provider_email_lists_customer_and_dates() {
        let html = provider_new_booking_html(&snapshot(), Some("https://dash.example.com"));
        assert!(html.contains("Lagoon View Villa"));
        assert!(html.contains("Amara Silva"));
        assert!(html.contains("2026-09-01"));
        assert!(html.contains("2026-09-04"));
        assert!(html.contains("Late check-in"));
        assert!(html.contains("https://dash.example.com"));
        assert!(html.contains("Not provided"));
    }

    #[test]
    fn customer_email_carries_the_event_message() {
        let event = NotificationEvent {
            kind: NotificationKind::BookingConfirmed,
            recipient_user_id: "u1".to_string(),
            recipient_email: Some("amara@example.com".to_string()),
            provider_id: None,
            title: "Booking Confirmed!".to_string(),
            message: "Great news! Your booking has been confirmed.".to_string(),
            booking: snapshot(),
        };
        let html = customer_status_html(&event);
        assert!(html.contains("Booking Confirmed!"));
        assert!(html.contains("Great news!"));
        assert!(html.contains("Dear Amara Silva"));
    }
}
