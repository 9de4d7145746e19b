// --- File: crates/travelwish_notify/src/dispatcher.rs ---
//! Notification fan-out across channels.
//!
//! The dispatcher runs every configured channel for every event; channels
//! decide applicability themselves and report `Skipped` when an event is not
//! for them. A failing channel is logged and recorded, never propagated, so
//! a booking operation can treat dispatch as infallible.

use std::sync::Arc;
use tracing::warn;

use travelwish_common::services::{
    BoxFuture, BoxedError, ChannelDelivery, DeliveryStatus, DispatchReport, NotificationDispatch,
    NotificationEvent,
};

/// One delivery channel (in-app, provider feed, email, push).
pub trait NotificationChannel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Attempt delivery of one event. Channels report `Skipped` for events
    /// that don't apply to them rather than erroring.
    fn deliver<'a>(
        &'a self,
        event: &'a NotificationEvent,
    ) -> BoxFuture<'a, ChannelDelivery, BoxedError>;
}

/// Fans one event out to all channels and collects per-channel outcomes.
pub struct NotificationDispatcher {
    channels: Vec<Arc<dyn NotificationChannel>>,
}

impl NotificationDispatcher {
    pub fn new(channels: Vec<Arc<dyn NotificationChannel>>) -> Self {
        Self { channels }
    }
}

impl NotificationDispatch for NotificationDispatcher {
    fn dispatch(&self, event: NotificationEvent) -> BoxFuture<'_, DispatchReport, BoxedError> {
        Box::pin(async move {
            let mut report = DispatchReport::default();
            for channel in &self.channels {
                match channel.deliver(&event).await {
                    Ok(delivery) => report.deliveries.push(delivery),
                    Err(e) => {
                        warn!(
                            channel = channel.name(),
                            kind = event.kind.as_str(),
                            booking_id = %event.booking.booking_id,
                            error = %e,
                            "Notification channel failed"
                        );
                        report.record(channel.name(), DeliveryStatus::Failed, Some(e.to_string()));
                    }
                }
            }
            Ok(report)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use travelwish_common::services::{BookingSnapshot, NotificationKind};

    struct AlwaysFails;

    impl NotificationChannel for AlwaysFails {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn deliver<'a>(
            &'a self,
            _event: &'a NotificationEvent,
        ) -> BoxFuture<'a, ChannelDelivery, BoxedError> {
            Box::pin(async { Err("relay unreachable".into()) })
        }
    }

    struct AlwaysSends;

    impl NotificationChannel for AlwaysSends {
        fn name(&self) -> &'static str {
            "in_app"
        }

        fn deliver<'a>(
            &'a self,
            _event: &'a NotificationEvent,
        ) -> BoxFuture<'a, ChannelDelivery, BoxedError> {
            Box::pin(async {
                Ok(ChannelDelivery {
                    channel: "in_app",
                    status: DeliveryStatus::Sent,
                    detail: None,
                })
            })
        }
    }

    fn event() -> NotificationEvent {
        NotificationEvent {
            kind: NotificationKind::NewBooking,
            recipient_user_id: "u1".to_string(),
            recipient_email: None,
            provider_id: None,
            title: "Booking Submitted".to_string(),
            message: "Your request was submitted".to_string(),
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
                status: "pending".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn failing_channel_is_recorded_and_others_still_run() {
        let dispatcher =
            NotificationDispatcher::new(vec![Arc::new(AlwaysFails), Arc::new(AlwaysSends)]);

        let report = dispatcher.dispatch(event()).await.unwrap();
        assert_eq!(report.deliveries.len(), 2);

        let failed: Vec<_> = report.failed_channels().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].channel, "broken");
        assert_eq!(report.deliveries[1].status, DeliveryStatus::Sent);
    }

    #[tokio::test]
    async fn empty_dispatcher_reports_nothing() {
        let dispatcher = NotificationDispatcher::new(Vec::new());
        let report = dispatcher.dispatch(event()).await.unwrap();
        assert!(report.deliveries.is_empty());
    }
}
