// --- File: crates/travelwish_notify/src/channels.rs ---
//! The concrete notification channels.
//!
//! Each channel decides for itself whether an event applies: in-app always
//! persists for the recipient, the feed only handles provider-targeted
//! events, email needs a recipient address, push needs active device tokens.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::dispatcher::NotificationChannel;
use crate::feed::ProviderFeed;
use crate::mail::MailRelayClient;
use crate::push::PushSender;
use travelwish_common::services::{
    BoxFuture, BoxedError, ChannelDelivery, DeliveryStatus, NotificationEvent,
};
use travelwish_db::{
    DeviceTokenRepository, NewNotification, NewPushDelivery, NotificationRepository,
    PushDeliveryRepository, PushStatus,
};

fn delivery(
    channel: &'static str,
    status: DeliveryStatus,
    detail: Option<String>,
) -> ChannelDelivery {
    ChannelDelivery {
        channel,
        status,
        detail,
    }
}

/// Persists an in-app notification row for the recipient.
pub struct InAppChannel {
    notifications: Arc<dyn NotificationRepository>,
}

impl InAppChannel {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }
}

impl NotificationChannel for InAppChannel {
    fn name(&self) -> &'static str {
        "in_app"
    }

    fn deliver<'a>(
        &'a self,
        event: &'a NotificationEvent,
    ) -> BoxFuture<'a, ChannelDelivery, BoxedError> {
        Box::pin(async move {
            let stored = self
                .notifications
                .insert(NewNotification {
                    user_id: event.recipient_user_id.clone(),
                    kind: event.kind,
                    title: event.title.clone(),
                    message: event.message.clone(),
                    booking_id: Some(event.booking.booking_id.clone()),
                })
                .await?;
            Ok(delivery(
                "in_app",
                DeliveryStatus::Sent,
                Some(stored.id),
            ))
        })
    }
}

/// Appends provider-targeted events to the in-process dashboard feed.
pub struct FeedChannel {
    feed: Arc<ProviderFeed>,
}

impl FeedChannel {
    pub fn new(feed: Arc<ProviderFeed>) -> Self {
        Self { feed }
    }
}

impl NotificationChannel for FeedChannel {
    fn name(&self) -> &'static str {
        "provider_feed"
    }

    fn deliver<'a>(
        &'a self,
        event: &'a NotificationEvent,
    ) -> BoxFuture<'a, ChannelDelivery, BoxedError> {
        Box::pin(async move {
            let Some(provider_id) = &event.provider_id else {
                return Ok(delivery("provider_feed", DeliveryStatus::Skipped, None));
            };
            let entry = self.feed.push(provider_id, event);
            Ok(delivery(
                "provider_feed",
                DeliveryStatus::Sent,
                Some(entry.id),
            ))
        })
    }
}

/// Sends the rendered HTML email when the event carries a recipient address.
pub struct EmailChannel {
    mail: Option<Arc<MailRelayClient>>,
}

impl EmailChannel {
    pub fn new(mail: Option<Arc<MailRelayClient>>) -> Self {
        Self { mail }
    }
}

impl NotificationChannel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    fn deliver<'a>(
        &'a self,
        event: &'a NotificationEvent,
    ) -> BoxFuture<'a, ChannelDelivery, BoxedError> {
        Box::pin(async move {
            let Some(mail) = &self.mail else {
                return Ok(delivery(
                    "email",
                    DeliveryStatus::Skipped,
                    Some("mail relay not configured".to_string()),
                ));
            };
            let Some(to) = &event.recipient_email else {
                return Ok(delivery("email", DeliveryStatus::Skipped, None));
            };

            let (subject, html) = mail.render(event);
            mail.send(to, &subject, &html).await?;
            Ok(delivery("email", DeliveryStatus::Sent, None))
        })
    }
}

/// Sends one push message per active device token of the recipient and
/// records a delivery row per attempt.
pub struct PushChannel {
    sender: Option<Arc<dyn PushSender>>,
    devices: Arc<dyn DeviceTokenRepository>,
    deliveries: Arc<dyn PushDeliveryRepository>,
}

impl PushChannel {
    pub fn new(
        sender: Option<Arc<dyn PushSender>>,
        devices: Arc<dyn DeviceTokenRepository>,
        deliveries: Arc<dyn PushDeliveryRepository>,
    ) -> Self {
        Self {
            sender,
            devices,
            deliveries,
        }
    }
}

impl NotificationChannel for PushChannel {
    fn name(&self) -> &'static str {
        "push"
    }

    fn deliver<'a>(
        &'a self,
        event: &'a NotificationEvent,
    ) -> BoxFuture<'a, ChannelDelivery, BoxedError> {
        Box::pin(async move {
            let Some(sender) = &self.sender else {
                return Ok(delivery(
                    "push",
                    DeliveryStatus::Skipped,
                    Some("push not configured".to_string()),
                ));
            };

            let tokens = self
                .devices
                .find_active_by_user(&event.recipient_user_id)
                .await?;
            if tokens.is_empty() {
                return Ok(delivery(
                    "push",
                    DeliveryStatus::Skipped,
                    Some("no active device tokens".to_string()),
                ));
            }

            let mut data = HashMap::new();
            data.insert("booking_id".to_string(), event.booking.booking_id.clone());
            data.insert("kind".to_string(), event.kind.as_str().to_string());

            let mut sent = 0usize;
            for token in &tokens {
                let result = sender
                    .send_to_token(&token.token, &event.title, &event.message, Some(data.clone()))
                    .await;
                let (status, error) = match &result {
                    Ok(message_id) => {
                        debug!(message_id = %message_id, "Push delivered");
                        sent += 1;
                        (PushStatus::Sent, None)
                    }
                    Err(e) => (PushStatus::Failed, Some(e.to_string())),
                };
                self.deliveries
                    .record(NewPushDelivery {
                        user_id: event.recipient_user_id.clone(),
                        device_token: token.token.clone(),
                        title: event.title.clone(),
                        body: event.message.clone(),
                        status,
                        error,
                        booking_id: Some(event.booking.booking_id.clone()),
                    })
                    .await?;
            }

            let detail = format!("{}/{} delivered", sent, tokens.len());
            if sent == 0 {
                Err(detail.into())
            } else {
                Ok(delivery("push", DeliveryStatus::Sent, Some(detail)))
            }
        })
    }
}
