//! SQL implementation of the push delivery repository

use crate::error::DbError;
use crate::repositories::push_deliveries::{
    NewPushDelivery, PushDelivery, PushDeliveryRepository, PushStatus,
};
use crate::DbClient;
use sqlx::Row;
use tracing::{debug, error};
use travelwish_common::services::BoxFuture;

/// SQL implementation of the push delivery repository
#[derive(Debug, Clone)]
pub struct SqlPushDeliveryRepository {
    db_client: DbClient,
}

impl SqlPushDeliveryRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn map_row(row: &sqlx::any::AnyRow) -> PushDelivery {
    let status_text: String = row.try_get("status").unwrap_or_default();
    let status = if status_text == "sent" {
        PushStatus::Sent
    } else {
        PushStatus::Failed
    };

    PushDelivery {
        id: row.try_get("id").unwrap_or_default(),
        user_id: row.try_get("user_id").unwrap_or_default(),
        device_token: row.try_get("device_token").unwrap_or_default(),
        title: row.try_get("title").unwrap_or_default(),
        body: row.try_get("body").unwrap_or_default(),
        status,
        error: row.try_get("error").ok(),
        booking_id: row.try_get("booking_id").ok(),
        created_at: row.try_get("created_at").ok(),
    }
}

impl PushDeliveryRepository for SqlPushDeliveryRepository {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        let db = self.db_client.clone();
        Box::pin(async move {
            debug!("Initializing push deliveries schema");

            let query = r#"
                CREATE TABLE IF NOT EXISTS push_deliveries (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    device_token TEXT NOT NULL,
                    title TEXT NOT NULL,
                    body TEXT NOT NULL,
                    status TEXT NOT NULL,
                    error TEXT,
                    booking_id TEXT,
                    created_at TEXT NOT NULL
                )
            "#;

            db.execute(query).await?;
            Ok(())
        })
    }

    fn record(&self, delivery: NewPushDelivery) -> BoxFuture<'_, PushDelivery, DbError> {
        let db = self.db_client.clone();
        Box::pin(async move {
            let id = uuid::Uuid::new_v4().to_string();
            let created_at = chrono::Utc::now().to_rfc3339();

            let query = r#"
                INSERT INTO push_deliveries (id, user_id, device_token, title, body, status, error, booking_id, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#;

            sqlx::query(query)
                .bind(&id)
                .bind(&delivery.user_id)
                .bind(&delivery.device_token)
                .bind(&delivery.title)
                .bind(&delivery.body)
                .bind(delivery.status.as_str())
                .bind(&delivery.error)
                .bind(&delivery.booking_id)
                .bind(&created_at)
                .execute(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to record push delivery: {}", e);
                    DbError::from_query_error(e)
                })?;

            Ok(PushDelivery {
                id,
                user_id: delivery.user_id,
                device_token: delivery.device_token,
                title: delivery.title,
                body: delivery.body,
                status: delivery.status,
                error: delivery.error,
                booking_id: delivery.booking_id,
                created_at: Some(created_at),
            })
        })
    }

    fn find_by_user(&self, user_id: &str) -> BoxFuture<'_, Vec<PushDelivery>, DbError> {
        let db = self.db_client.clone();
        let user_id = user_id.to_string();
        Box::pin(async move {
            let query = r#"
                SELECT id, user_id, device_token, title, body, status, error, booking_id, created_at
                FROM push_deliveries
                WHERE user_id = $1
                ORDER BY created_at DESC
            "#;

            let rows = sqlx::query(query)
                .bind(&user_id)
                .fetch_all(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to list push deliveries: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            Ok(rows.iter().map(map_row).collect())
        })
    }
}
