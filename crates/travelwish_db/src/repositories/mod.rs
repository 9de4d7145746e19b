//! Repositories for TravelWish domain records.
//!
//! Each repository is a pair of files: the trait plus its record types, and
//! the SQL implementation against the shared [`DbClient`](crate::DbClient).
//! Traits are object safe so handler state can hold `Arc<dyn ...>` and tests
//! can inject in-memory fakes.

pub mod bookings;
pub mod bookings_sql;
pub mod card_tokens;
pub mod card_tokens_sql;
pub mod device_tokens;
pub mod device_tokens_sql;
pub mod notifications;
pub mod notifications_sql;
pub mod push_deliveries;
pub mod push_deliveries_sql;
pub mod resources;
pub mod resources_sql;
pub mod users;
pub mod users_sql;

pub use bookings::{Booking, BookingRepository, BookingStatus, NewBooking};
pub use bookings_sql::SqlBookingRepository;
pub use card_tokens::{CardToken, CardTokenRepository, NewCardToken};
pub use card_tokens_sql::SqlCardTokenRepository;
pub use device_tokens::{DevicePlatform, DeviceToken, DeviceTokenRepository};
pub use device_tokens_sql::SqlDeviceTokenRepository;
pub use notifications::{NewNotification, Notification, NotificationRepository};
pub use notifications_sql::SqlNotificationRepository;
pub use push_deliveries::{NewPushDelivery, PushDelivery, PushDeliveryRepository, PushStatus};
pub use push_deliveries_sql::SqlPushDeliveryRepository;
pub use resources::{ResourceDirectory, ResourceSummary};
pub use resources_sql::SqlResourceDirectory;
pub use users::{UserRecord, UserRepository};
pub use users_sql::SqlUserRepository;
