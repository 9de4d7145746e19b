// --- File: crates/services/travelwish_backend/src/app_state.rs ---
//! Application state wiring.
//!
//! Builds the shared repositories, the gateway adapter, and the notification
//! dispatcher from config, then hands each feature crate its own state
//! struct. The `use_*` runtime flags gate optional services: payments needs a
//! gateway config, mail and push degrade to skipped channels when absent.

use std::sync::Arc;
use tracing::{info, warn};

use travelwish_bookings::BookingState;
use travelwish_common::services::{NotificationDispatch, PaymentGatewayService};
use travelwish_config::AppConfig;
use travelwish_db::{
    BookingRepository, CardTokenRepository, DbClient, DbError, DeviceTokenRepository,
    NotificationRepository, PushDeliveryRepository, ResourceDirectory, SqlBookingRepository,
    SqlCardTokenRepository,
    SqlDeviceTokenRepository, SqlNotificationRepository, SqlPushDeliveryRepository,
    SqlResourceDirectory, SqlUserRepository, UserRepository,
};
use travelwish_notify::{
    EmailChannel, FeedChannel, InAppChannel, MailRelayClient, NotificationChannel,
    NotificationDispatcher, NotifyState, ProviderFeed, PushChannel, PushClient, PushSender,
    DEFAULT_FEED_CAPACITY,
};
use travelwish_payments::PaymentState;
use travelwish_stripe::StripeGatewayService;

/// Everything the router needs, built once at startup.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub booking_state: Arc<BookingState>,
    /// Absent when `use_payments` is off or the gateway is not configured.
    pub payment_state: Option<Arc<PaymentState>>,
    pub notify_state: Arc<NotifyState>,
}

impl AppState {
    pub async fn new(config: Arc<AppConfig>) -> Result<Self, DbError> {
        let db = DbClient::new(&config).await?;
        info!(database = %db, "Database client ready");

        // Repositories share the pooled client
        let bookings = Arc::new(SqlBookingRepository::new(db.clone()));
        let resources = Arc::new(SqlResourceDirectory::new(db.clone()));
        let users = Arc::new(SqlUserRepository::new(db.clone()));
        let cards = Arc::new(SqlCardTokenRepository::new(db.clone()));
        let notifications = Arc::new(SqlNotificationRepository::new(db.clone()));
        let devices = Arc::new(SqlDeviceTokenRepository::new(db.clone()));
        let push_deliveries = Arc::new(SqlPushDeliveryRepository::new(db.clone()));

        bookings.init_schema().await?;
        resources.init_schema().await?;
        users.init_schema().await?;
        cards.init_schema().await?;
        notifications.init_schema().await?;
        devices.init_schema().await?;
        push_deliveries.init_schema().await?;

        let feed_capacity = config
            .notify
            .as_ref()
            .and_then(|n| n.feed_capacity)
            .unwrap_or(DEFAULT_FEED_CAPACITY);
        let feed = Arc::new(ProviderFeed::new(feed_capacity));

        let mail = if config.use_mail {
            match &config.mail {
                Some(mail_config) => Some(Arc::new(MailRelayClient::new(mail_config.clone()))),
                None => {
                    warn!("use_mail is set but no mail config present; email channel disabled");
                    None
                }
            }
        } else {
            None
        };

        let push_sender: Option<Arc<dyn PushSender>> = if config.use_push {
            match &config.push {
                Some(push_config) => Some(Arc::new(PushClient::new(push_config.clone()))),
                None => {
                    warn!("use_push is set but no push config present; push channel disabled");
                    None
                }
            }
        } else {
            None
        };

        let channels: Vec<Arc<dyn NotificationChannel>> = vec![
            Arc::new(InAppChannel::new(notifications.clone())),
            Arc::new(FeedChannel::new(feed.clone())),
            Arc::new(EmailChannel::new(mail)),
            Arc::new(PushChannel::new(
                push_sender,
                devices.clone(),
                push_deliveries,
            )),
        ];
        let dispatcher: Arc<dyn NotificationDispatch> =
            Arc::new(NotificationDispatcher::new(channels));

        let booking_state = Arc::new(BookingState {
            bookings,
            resources,
            dispatcher,
        });

        let payment_state = if config.use_payments && config.gateway.is_some() {
            let gateway: Arc<dyn PaymentGatewayService> =
                Arc::new(StripeGatewayService::new(config.clone()));
            let default_currency = config
                .gateway
                .as_ref()
                .and_then(|g| g.default_currency.clone())
                .unwrap_or_else(|| "lkr".to_string());
            Some(Arc::new(PaymentState {
                gateway,
                users,
                cards,
                default_currency,
            }))
        } else {
            info!("Payments disabled (use_payments off or gateway not configured)");
            None
        };

        let notify_state = Arc::new(NotifyState {
            devices,
            notifications,
            feed,
        });

        Ok(Self {
            config,
            booking_state,
            payment_state,
            notify_state,
        })
    }
}
