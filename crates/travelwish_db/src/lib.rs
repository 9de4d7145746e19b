//! Database integration for TravelWish
//!
//! Provides a database-agnostic client built on SQLx's `Any` driver (SQLite
//! or PostgreSQL via feature flags) plus the repositories for the booking,
//! payment and notification domains. Repository traits are object safe so
//! application state can hold `Arc<dyn ...>` and tests can swap in in-memory
//! implementations.

pub mod client;
pub mod error;
pub mod repositories;

pub use client::DbClient;
pub use error::DbError;

pub use repositories::{
    Booking, BookingRepository, BookingStatus, CardToken, CardTokenRepository, DevicePlatform,
    DeviceToken, DeviceTokenRepository, NewBooking, NewCardToken, NewNotification,
    NewPushDelivery, Notification, NotificationRepository, PushDelivery, PushDeliveryRepository,
    PushStatus, ResourceDirectory, ResourceSummary, SqlBookingRepository, SqlCardTokenRepository,
    SqlDeviceTokenRepository, SqlNotificationRepository, SqlPushDeliveryRepository,
    SqlResourceDirectory, SqlUserRepository, UserRecord, UserRepository,
};
