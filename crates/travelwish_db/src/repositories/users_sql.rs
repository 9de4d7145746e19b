//! SQL implementation of the user projection repository

use crate::error::DbError;
use crate::repositories::users::{UserRecord, UserRepository};
use crate::DbClient;
use sqlx::Row;
use tracing::{debug, error};
use travelwish_common::services::BoxFuture;

/// SQL implementation of the user projection repository
#[derive(Debug, Clone)]
pub struct SqlUserRepository {
    db_client: DbClient,
}

impl SqlUserRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

impl UserRepository for SqlUserRepository {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        let db = self.db_client.clone();
        Box::pin(async move {
            debug!("Initializing users schema");

            let query = r#"
                CREATE TABLE IF NOT EXISTS users (
                    id TEXT PRIMARY KEY,
                    email TEXT NOT NULL,
                    full_name TEXT NOT NULL,
                    gateway_customer_id TEXT
                )
            "#;

            db.execute(query).await?;
            Ok(())
        })
    }

    fn find_by_id(&self, user_id: &str) -> BoxFuture<'_, Option<UserRecord>, DbError> {
        let db = self.db_client.clone();
        let user_id = user_id.to_string();
        Box::pin(async move {
            let row = sqlx::query(
                "SELECT id, email, full_name, gateway_customer_id FROM users WHERE id = $1",
            )
            .bind(&user_id)
            .fetch_optional(db.pool())
            .await
            .map_err(|e| {
                error!("Failed to find user: {}", e);
                DbError::QueryError(e.to_string())
            })?;

            Ok(row.map(|row| UserRecord {
                id: row.try_get("id").unwrap_or_default(),
                email: row.try_get("email").unwrap_or_default(),
                full_name: row.try_get("full_name").unwrap_or_default(),
                gateway_customer_id: row.try_get("gateway_customer_id").ok(),
            }))
        })
    }

    fn set_gateway_customer_id(
        &self,
        user_id: &str,
        customer_id: &str,
    ) -> BoxFuture<'_, bool, DbError> {
        let db = self.db_client.clone();
        let user_id = user_id.to_string();
        let customer_id = customer_id.to_string();
        Box::pin(async move {
            debug!(user_id = %user_id, "Caching gateway customer id");

            let result = sqlx::query("UPDATE users SET gateway_customer_id = $1 WHERE id = $2")
                .bind(&customer_id)
                .bind(&user_id)
                .execute(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to set gateway customer id: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            Ok(result.rows_affected() > 0)
        })
    }
}
