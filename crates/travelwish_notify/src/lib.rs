//! Notification fan-out for TravelWish.
//!
//! One booking event fans out across four channels: a persisted in-app
//! notification, the in-process provider dashboard feed, a relay email, and
//! FCM-style push to the recipient's registered devices. Fan-out is
//! best-effort; the dispatcher records per-channel outcomes and never fails
//! the triggering operation.

pub mod channels;
pub mod dispatcher;
pub mod doc;
pub mod error;
pub mod feed;
pub mod handlers;
pub mod mail;
pub mod push;
pub mod routes;

pub use channels::{EmailChannel, FeedChannel, InAppChannel, PushChannel};
pub use dispatcher::{NotificationChannel, NotificationDispatcher};
pub use error::NotifyError;
pub use feed::{FeedEntry, ProviderFeed, DEFAULT_FEED_CAPACITY};
pub use handlers::NotifyState;
pub use mail::MailRelayClient;
pub use push::{PushClient, PushSender};
pub use routes::routes;
