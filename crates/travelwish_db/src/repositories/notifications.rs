//! Repository for in-app notifications
//!
//! Rows are written by the in-app notification channel and only ever mutated
//! to flip the `is_read` flag.

use crate::error::DbError;
use serde::{Deserialize, Serialize};
use travelwish_common::services::{BoxFuture, NotificationKind};

/// A stored in-app notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub booking_id: Option<String>,
    pub created_at: Option<String>,
}

/// Fields for persisting a new notification.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub booking_id: Option<String>,
}

/// Repository for in-app notifications.
pub trait NotificationRepository: Send + Sync {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError>;

    fn insert(&self, notification: NewNotification) -> BoxFuture<'_, Notification, DbError>;

    /// All notifications for a user, newest first.
    fn find_by_user(&self, user_id: &str) -> BoxFuture<'_, Vec<Notification>, DbError>;

    /// Mark a single notification read. Returns `false` when it doesn't exist.
    fn mark_read(&self, notification_id: &str) -> BoxFuture<'_, bool, DbError>;

    /// Mark all of a user's notifications read, returning the modified count.
    fn mark_all_read(&self, user_id: &str) -> BoxFuture<'_, u64, DbError>;

    fn unread_count(&self, user_id: &str) -> BoxFuture<'_, i64, DbError>;
}
