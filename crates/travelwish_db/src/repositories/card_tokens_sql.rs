//! SQL implementation of the card token repository

use crate::error::DbError;
use crate::repositories::card_tokens::{CardToken, CardTokenRepository, NewCardToken};
use crate::DbClient;
use sqlx::Row;
use tracing::{debug, error};
use travelwish_common::services::BoxFuture;

/// SQL implementation of the card token repository
#[derive(Debug, Clone)]
pub struct SqlCardTokenRepository {
    db_client: DbClient,
}

impl SqlCardTokenRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn map_row(row: &sqlx::any::AnyRow) -> CardToken {
    CardToken {
        id: row.try_get("id").unwrap_or_default(),
        user_id: row.try_get("user_id").unwrap_or_default(),
        card_holder_name: row.try_get("card_holder_name").unwrap_or_default(),
        masked_number: row.try_get("masked_number").unwrap_or_default(),
        expiry: row.try_get("expiry").unwrap_or_default(),
        brand: row.try_get("brand").ok(),
        gateway_payment_method_id: row.try_get("gateway_payment_method_id").ok(),
        gateway_customer_id: row.try_get("gateway_customer_id").ok(),
        // Booleans are stored as INTEGER for the Any driver
        is_active: row.try_get::<i64, _>("is_active").unwrap_or(0) != 0,
        created_at: row.try_get("created_at").ok(),
    }
}

const SELECT_COLUMNS: &str = r#"
    id, user_id, card_holder_name, masked_number, expiry, brand,
    gateway_payment_method_id, gateway_customer_id, is_active, created_at
"#;

impl CardTokenRepository for SqlCardTokenRepository {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        let db = self.db_client.clone();
        Box::pin(async move {
            debug!("Initializing card tokens schema");

            let query = r#"
                CREATE TABLE IF NOT EXISTS card_tokens (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    card_holder_name TEXT NOT NULL,
                    masked_number TEXT NOT NULL,
                    expiry TEXT NOT NULL,
                    brand TEXT,
                    gateway_payment_method_id TEXT,
                    gateway_customer_id TEXT,
                    is_active INTEGER NOT NULL DEFAULT 1,
                    created_at TEXT NOT NULL,
                    UNIQUE(user_id, gateway_payment_method_id)
                )
            "#;

            db.execute(query).await?;
            Ok(())
        })
    }

    fn insert(&self, token: NewCardToken) -> BoxFuture<'_, CardToken, DbError> {
        let db = self.db_client.clone();
        Box::pin(async move {
            let id = uuid::Uuid::new_v4().to_string();
            let created_at = chrono::Utc::now().to_rfc3339();
            debug!(user_id = %token.user_id, "Vaulting card token");

            let query = r#"
                INSERT INTO card_tokens (
                    id, user_id, card_holder_name, masked_number, expiry, brand,
                    gateway_payment_method_id, gateway_customer_id, is_active, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 1, $9)
            "#;

            sqlx::query(query)
                .bind(&id)
                .bind(&token.user_id)
                .bind(&token.card_holder_name)
                .bind(&token.masked_number)
                .bind(&token.expiry)
                .bind(&token.brand)
                .bind(&token.gateway_payment_method_id)
                .bind(&token.gateway_customer_id)
                .bind(&created_at)
                .execute(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to insert card token: {}", e);
                    DbError::from_query_error(e)
                })?;

            Ok(CardToken {
                id,
                user_id: token.user_id,
                card_holder_name: token.card_holder_name,
                masked_number: token.masked_number,
                expiry: token.expiry,
                brand: token.brand,
                gateway_payment_method_id: token.gateway_payment_method_id,
                gateway_customer_id: token.gateway_customer_id,
                is_active: true,
                created_at: Some(created_at),
            })
        })
    }

    fn find_active_by_user(&self, user_id: &str) -> BoxFuture<'_, Vec<CardToken>, DbError> {
        let db = self.db_client.clone();
        let user_id = user_id.to_string();
        Box::pin(async move {
            let query = format!(
                "SELECT {} FROM card_tokens WHERE user_id = $1 AND is_active = 1 ORDER BY created_at DESC",
                SELECT_COLUMNS
            );

            let rows = sqlx::query(&query)
                .bind(&user_id)
                .fetch_all(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to list card tokens: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            Ok(rows.iter().map(map_row).collect())
        })
    }

    fn find_active_for_user(
        &self,
        card_id: &str,
        user_id: &str,
    ) -> BoxFuture<'_, Option<CardToken>, DbError> {
        let db = self.db_client.clone();
        let card_id = card_id.to_string();
        let user_id = user_id.to_string();
        Box::pin(async move {
            let query = format!(
                "SELECT {} FROM card_tokens WHERE id = $1 AND user_id = $2 AND is_active = 1",
                SELECT_COLUMNS
            );

            let row = sqlx::query(&query)
                .bind(&card_id)
                .bind(&user_id)
                .fetch_optional(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to find card token: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            Ok(row.as_ref().map(map_row))
        })
    }

    fn find_by_payment_method(
        &self,
        user_id: &str,
        gateway_payment_method_id: &str,
    ) -> BoxFuture<'_, Option<CardToken>, DbError> {
        let db = self.db_client.clone();
        let user_id = user_id.to_string();
        let pm_id = gateway_payment_method_id.to_string();
        Box::pin(async move {
            let query = format!(
                "SELECT {} FROM card_tokens WHERE user_id = $1 AND gateway_payment_method_id = $2",
                SELECT_COLUMNS
            );

            let row = sqlx::query(&query)
                .bind(&user_id)
                .bind(&pm_id)
                .fetch_optional(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to find card token by payment method: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            Ok(row.as_ref().map(map_row))
        })
    }

    fn deactivate(&self, card_id: &str, user_id: &str) -> BoxFuture<'_, bool, DbError> {
        let db = self.db_client.clone();
        let card_id = card_id.to_string();
        let user_id = user_id.to_string();
        Box::pin(async move {
            debug!(card_id = %card_id, "Deactivating card token");

            let result = sqlx::query(
                "UPDATE card_tokens SET is_active = 0 WHERE id = $1 AND user_id = $2 AND is_active = 1",
            )
            .bind(&card_id)
            .bind(&user_id)
            .execute(db.pool())
            .await
            .map_err(|e| {
                error!("Failed to deactivate card token: {}", e);
                DbError::QueryError(e.to_string())
            })?;

            Ok(result.rows_affected() > 0)
        })
    }
}
