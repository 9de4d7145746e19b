//! SQL implementation of the notification repository

use crate::error::DbError;
use crate::repositories::notifications::{NewNotification, Notification, NotificationRepository};
use crate::DbClient;
use sqlx::Row;
use tracing::{debug, error};
use travelwish_common::services::{BoxFuture, NotificationKind};

/// SQL implementation of the notification repository
#[derive(Debug, Clone)]
pub struct SqlNotificationRepository {
    db_client: DbClient,
}

impl SqlNotificationRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn parse_kind(kind: &str) -> NotificationKind {
    match kind {
        "new_booking" => NotificationKind::NewBooking,
        "booking_confirmed" => NotificationKind::BookingConfirmed,
        "booking_rejected" => NotificationKind::BookingRejected,
        "booking_cancelled" => NotificationKind::BookingCancelled,
        "booking_completed" => NotificationKind::BookingCompleted,
        // Unknown rows default to the generic booking event
        _ => NotificationKind::NewBooking,
    }
}

fn map_row(row: &sqlx::any::AnyRow) -> Notification {
    let kind_text: String = row.try_get("kind").unwrap_or_default();
    Notification {
        id: row.try_get("id").unwrap_or_default(),
        user_id: row.try_get("user_id").unwrap_or_default(),
        kind: parse_kind(&kind_text),
        title: row.try_get("title").unwrap_or_default(),
        message: row.try_get("message").unwrap_or_default(),
        is_read: row.try_get::<i64, _>("is_read").unwrap_or(0) != 0,
        booking_id: row.try_get("booking_id").ok(),
        created_at: row.try_get("created_at").ok(),
    }
}

impl NotificationRepository for SqlNotificationRepository {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        let db = self.db_client.clone();
        Box::pin(async move {
            debug!("Initializing notifications schema");

            let query = r#"
                CREATE TABLE IF NOT EXISTS notifications (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    title TEXT NOT NULL,
                    message TEXT NOT NULL,
                    is_read INTEGER NOT NULL DEFAULT 0,
                    booking_id TEXT,
                    created_at TEXT NOT NULL
                )
            "#;

            db.execute(query).await?;
            Ok(())
        })
    }

    fn insert(&self, notification: NewNotification) -> BoxFuture<'_, Notification, DbError> {
        let db = self.db_client.clone();
        Box::pin(async move {
            let id = uuid::Uuid::new_v4().to_string();
            let created_at = chrono::Utc::now().to_rfc3339();
            debug!(user_id = %notification.user_id, kind = notification.kind.as_str(), "Persisting notification");

            let query = r#"
                INSERT INTO notifications (id, user_id, kind, title, message, is_read, booking_id, created_at)
                VALUES ($1, $2, $3, $4, $5, 0, $6, $7)
            "#;

            sqlx::query(query)
                .bind(&id)
                .bind(&notification.user_id)
                .bind(notification.kind.as_str())
                .bind(&notification.title)
                .bind(&notification.message)
                .bind(&notification.booking_id)
                .bind(&created_at)
                .execute(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to insert notification: {}", e);
                    DbError::from_query_error(e)
                })?;

            Ok(Notification {
                id,
                user_id: notification.user_id,
                kind: notification.kind,
                title: notification.title,
                message: notification.message,
                is_read: false,
                booking_id: notification.booking_id,
                created_at: Some(created_at),
            })
        })
    }

    fn find_by_user(&self, user_id: &str) -> BoxFuture<'_, Vec<Notification>, DbError> {
        let db = self.db_client.clone();
        let user_id = user_id.to_string();
        Box::pin(async move {
            let query = r#"
                SELECT id, user_id, kind, title, message, is_read, booking_id, created_at
                FROM notifications
                WHERE user_id = $1
                ORDER BY created_at DESC
            "#;

            let rows = sqlx::query(query)
                .bind(&user_id)
                .fetch_all(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to list notifications: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            Ok(rows.iter().map(map_row).collect())
        })
    }

    fn mark_read(&self, notification_id: &str) -> BoxFuture<'_, bool, DbError> {
        let db = self.db_client.clone();
        let notification_id = notification_id.to_string();
        Box::pin(async move {
            let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = $1")
                .bind(&notification_id)
                .execute(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to mark notification read: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            Ok(result.rows_affected() > 0)
        })
    }

    fn mark_all_read(&self, user_id: &str) -> BoxFuture<'_, u64, DbError> {
        let db = self.db_client.clone();
        let user_id = user_id.to_string();
        Box::pin(async move {
            let result = sqlx::query(
                "UPDATE notifications SET is_read = 1 WHERE user_id = $1 AND is_read = 0",
            )
            .bind(&user_id)
            .execute(db.pool())
            .await
            .map_err(|e| {
                error!("Failed to mark notifications read: {}", e);
                DbError::QueryError(e.to_string())
            })?;

            Ok(result.rows_affected())
        })
    }

    fn unread_count(&self, user_id: &str) -> BoxFuture<'_, i64, DbError> {
        let db = self.db_client.clone();
        let user_id = user_id.to_string();
        Box::pin(async move {
            let row = sqlx::query(
                "SELECT COUNT(*) AS unread FROM notifications WHERE user_id = $1 AND is_read = 0",
            )
            .bind(&user_id)
            .fetch_one(db.pool())
            .await
            .map_err(|e| {
                error!("Failed to count unread notifications: {}", e);
                DbError::QueryError(e.to_string())
            })?;

            Ok(row.try_get::<i64, _>("unread").unwrap_or(0))
        })
    }
}
