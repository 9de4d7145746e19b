//! SQL implementation of the resource directory

use crate::error::DbError;
use crate::repositories::resources::{ResourceDirectory, ResourceSummary};
use crate::DbClient;
use sqlx::Row;
use tracing::{debug, error};
use travelwish_common::services::BoxFuture;

/// SQL implementation of the resource directory, reading a minimal
/// `listings` projection.
#[derive(Debug, Clone)]
pub struct SqlResourceDirectory {
    db_client: DbClient,
}

impl SqlResourceDirectory {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

impl ResourceDirectory for SqlResourceDirectory {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        let db = self.db_client.clone();
        Box::pin(async move {
            debug!("Initializing listings schema");

            let query = r#"
                CREATE TABLE IF NOT EXISTS listings (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    provider_id TEXT NOT NULL,
                    provider_email TEXT
                )
            "#;

            db.execute(query).await?;
            Ok(())
        })
    }

    fn find_by_id(&self, resource_id: &str) -> BoxFuture<'_, Option<ResourceSummary>, DbError> {
        let db = self.db_client.clone();
        let resource_id = resource_id.to_string();
        Box::pin(async move {
            let row = sqlx::query(
                "SELECT id, name, provider_id, provider_email FROM listings WHERE id = $1",
            )
            .bind(&resource_id)
            .fetch_optional(db.pool())
            .await
            .map_err(|e| {
                error!("Failed to find resource: {}", e);
                DbError::QueryError(e.to_string())
            })?;

            Ok(row.map(|row| ResourceSummary {
                id: row.try_get("id").unwrap_or_default(),
                name: row.try_get("name").unwrap_or_default(),
                provider_id: row.try_get("provider_id").unwrap_or_default(),
                provider_email: row.try_get("provider_email").ok(),
            }))
        })
    }
}
