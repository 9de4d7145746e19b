//! SQL implementation of the device token repository

use crate::error::DbError;
use crate::repositories::device_tokens::{DevicePlatform, DeviceToken, DeviceTokenRepository};
use crate::DbClient;
use sqlx::Row;
use std::str::FromStr;
use tracing::{debug, error, info};
use travelwish_common::services::BoxFuture;

/// SQL implementation of the device token repository
#[derive(Debug, Clone)]
pub struct SqlDeviceTokenRepository {
    db_client: DbClient,
}

impl SqlDeviceTokenRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn map_row(row: &sqlx::any::AnyRow) -> Result<DeviceToken, DbError> {
    let platform_text: String = row
        .try_get("platform")
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    let platform = DevicePlatform::from_str(&platform_text).map_err(DbError::QueryError)?;

    Ok(DeviceToken {
        id: row.try_get("id").unwrap_or_default(),
        user_id: row.try_get("user_id").unwrap_or_default(),
        token: row.try_get("token").unwrap_or_default(),
        platform,
        device_id: row.try_get("device_id").unwrap_or_default(),
        is_active: row.try_get::<i64, _>("is_active").unwrap_or(0) != 0,
        last_used: row.try_get("last_used").ok(),
    })
}

impl DeviceTokenRepository for SqlDeviceTokenRepository {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        let db = self.db_client.clone();
        Box::pin(async move {
            debug!("Initializing device tokens schema");

            let query = r#"
                CREATE TABLE IF NOT EXISTS device_tokens (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    token TEXT NOT NULL UNIQUE,
                    platform TEXT NOT NULL,
                    device_id TEXT NOT NULL,
                    is_active INTEGER NOT NULL DEFAULT 1,
                    last_used TEXT
                )
            "#;

            db.execute(query).await?;
            Ok(())
        })
    }

    fn register(
        &self,
        user_id: &str,
        token: &str,
        platform: DevicePlatform,
        device_id: &str,
    ) -> BoxFuture<'_, (DeviceToken, bool), DbError> {
        let db = self.db_client.clone();
        let user_id = user_id.to_string();
        let token = token.to_string();
        let device_id = device_id.to_string();
        Box::pin(async move {
            let now = chrono::Utc::now().to_rfc3339();

            let existing = sqlx::query("SELECT id FROM device_tokens WHERE token = $1")
                .bind(&token)
                .fetch_optional(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to look up device token: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            let (id, created) = if let Some(row) = existing {
                let id: String = row.try_get("id").unwrap_or_default();
                debug!(token_id = %id, "Reassigning existing device token");

                sqlx::query(
                    r#"
                    UPDATE device_tokens
                    SET user_id = $1, platform = $2, device_id = $3, is_active = 1, last_used = $4
                    WHERE id = $5
                    "#,
                )
                .bind(&user_id)
                .bind(platform.as_str())
                .bind(&device_id)
                .bind(&now)
                .bind(&id)
                .execute(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to reassign device token: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

                (id, false)
            } else {
                let id = uuid::Uuid::new_v4().to_string();
                debug!(token_id = %id, "Registering new device token");

                sqlx::query(
                    r#"
                    INSERT INTO device_tokens (id, user_id, token, platform, device_id, is_active, last_used)
                    VALUES ($1, $2, $3, $4, $5, 1, $6)
                    "#,
                )
                .bind(&id)
                .bind(&user_id)
                .bind(&token)
                .bind(platform.as_str())
                .bind(&device_id)
                .bind(&now)
                .execute(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to insert device token: {}", e);
                    DbError::from_query_error(e)
                })?;

                (id, true)
            };

            info!(token_id = %id, created = created, "Device token registered");
            Ok((
                DeviceToken {
                    id,
                    user_id,
                    token,
                    platform,
                    device_id,
                    is_active: true,
                    last_used: Some(now),
                },
                created,
            ))
        })
    }

    fn deactivate_by_token(&self, token: &str) -> BoxFuture<'_, bool, DbError> {
        let db = self.db_client.clone();
        let token = token.to_string();
        Box::pin(async move {
            let result = sqlx::query("UPDATE device_tokens SET is_active = 0 WHERE token = $1")
                .bind(&token)
                .execute(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to deactivate device token: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            Ok(result.rows_affected() > 0)
        })
    }

    fn find_active_by_user(&self, user_id: &str) -> BoxFuture<'_, Vec<DeviceToken>, DbError> {
        let db = self.db_client.clone();
        let user_id = user_id.to_string();
        Box::pin(async move {
            let query = r#"
                SELECT id, user_id, token, platform, device_id, is_active, last_used
                FROM device_tokens
                WHERE user_id = $1 AND is_active = 1
            "#;

            let rows = sqlx::query(query)
                .bind(&user_id)
                .fetch_all(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to list active device tokens: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            rows.iter().map(map_row).collect()
        })
    }

    fn find_by_user(&self, user_id: &str) -> BoxFuture<'_, Vec<DeviceToken>, DbError> {
        let db = self.db_client.clone();
        let user_id = user_id.to_string();
        Box::pin(async move {
            let query = r#"
                SELECT id, user_id, token, platform, device_id, is_active, last_used
                FROM device_tokens
                WHERE user_id = $1
            "#;

            let rows = sqlx::query(query)
                .bind(&user_id)
                .fetch_all(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to list device tokens: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            rows.iter().map(map_row).collect()
        })
    }
}
