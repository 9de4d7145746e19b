//! SQL implementation of the booking repository

use crate::error::DbError;
use crate::repositories::bookings::{Booking, BookingRepository, BookingStatus, NewBooking};
use crate::DbClient;
use sqlx::Row;
use std::str::FromStr;
use tracing::{debug, error};
use travelwish_common::services::BoxFuture;

/// SQL implementation of the booking repository
#[derive(Debug, Clone)]
pub struct SqlBookingRepository {
    db_client: DbClient,
}

impl SqlBookingRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

// Manual row mapping: the Any driver cannot decode chrono types or booleans,
// so timestamps are RFC 3339 TEXT and flags are INTEGER.
fn map_row(row: &sqlx::any::AnyRow) -> Result<Booking, DbError> {
    let status_text: String = row
        .try_get("status")
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    let status = BookingStatus::from_str(&status_text).map_err(DbError::QueryError)?;

    Ok(Booking {
        id: row.try_get("id").unwrap_or_default(),
        resource_id: row.try_get("resource_id").unwrap_or_default(),
        resource_name: row.try_get("resource_name").unwrap_or_default(),
        provider_id: row.try_get("provider_id").unwrap_or_default(),
        customer_user_id: row.try_get("customer_user_id").unwrap_or_default(),
        customer_name: row.try_get("customer_name").unwrap_or_default(),
        customer_email: row.try_get("customer_email").unwrap_or_default(),
        customer_phone: row.try_get("customer_phone").ok(),
        check_in_date: row.try_get("check_in_date").unwrap_or_default(),
        check_out_date: row.try_get("check_out_date").unwrap_or_default(),
        number_of_guests: row.try_get("number_of_guests").unwrap_or_default(),
        room_type: row.try_get("room_type").ok(),
        price_per_night: row.try_get("price_per_night").unwrap_or_default(),
        total_price: row.try_get("total_price").unwrap_or_default(),
        status,
        special_requests: row.try_get("special_requests").ok(),
        created_at: row.try_get("created_at").ok(),
    })
}

const SELECT_COLUMNS: &str = r#"
    id, resource_id, resource_name, provider_id, customer_user_id,
    customer_name, customer_email, customer_phone, check_in_date,
    check_out_date, number_of_guests, room_type, price_per_night,
    total_price, status, special_requests, created_at
"#;

impl BookingRepository for SqlBookingRepository {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        let db = self.db_client.clone();
        Box::pin(async move {
            debug!("Initializing bookings schema");

            let query = r#"
                CREATE TABLE IF NOT EXISTS bookings (
                    id TEXT PRIMARY KEY,
                    resource_id TEXT NOT NULL,
                    resource_name TEXT NOT NULL,
                    provider_id TEXT NOT NULL,
                    customer_user_id TEXT NOT NULL,
                    customer_name TEXT NOT NULL,
                    customer_email TEXT NOT NULL,
                    customer_phone TEXT,
                    check_in_date TEXT NOT NULL,
                    check_out_date TEXT NOT NULL,
                    number_of_guests INTEGER NOT NULL,
                    room_type TEXT,
                    price_per_night REAL NOT NULL DEFAULT 0,
                    total_price REAL NOT NULL DEFAULT 0,
                    status TEXT NOT NULL DEFAULT 'pending',
                    special_requests TEXT,
                    created_at TEXT NOT NULL
                )
            "#;

            db.execute(query).await?;
            Ok(())
        })
    }

    fn create(&self, booking: NewBooking) -> BoxFuture<'_, Booking, DbError> {
        let db = self.db_client.clone();
        Box::pin(async move {
            let id = uuid::Uuid::new_v4().to_string();
            let created_at = chrono::Utc::now().to_rfc3339();
            debug!(booking_id = %id, resource_id = %booking.resource_id, "Creating booking");

            let query = r#"
                INSERT INTO bookings (
                    id, resource_id, resource_name, provider_id, customer_user_id,
                    customer_name, customer_email, customer_phone, check_in_date,
                    check_out_date, number_of_guests, room_type, price_per_night,
                    total_price, status, special_requests, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#;

            sqlx::query(query)
                .bind(&id)
                .bind(&booking.resource_id)
                .bind(&booking.resource_name)
                .bind(&booking.provider_id)
                .bind(&booking.customer_user_id)
                .bind(&booking.customer_name)
                .bind(&booking.customer_email)
                .bind(&booking.customer_phone)
                .bind(&booking.check_in_date)
                .bind(&booking.check_out_date)
                .bind(booking.number_of_guests)
                .bind(&booking.room_type)
                .bind(booking.price_per_night)
                .bind(booking.total_price)
                .bind(BookingStatus::Pending.as_str())
                .bind(&booking.special_requests)
                .bind(&created_at)
                .execute(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to insert booking: {}", e);
                    DbError::from_query_error(e)
                })?;

            Ok(Booking {
                id,
                resource_id: booking.resource_id,
                resource_name: booking.resource_name,
                provider_id: booking.provider_id,
                customer_user_id: booking.customer_user_id,
                customer_name: booking.customer_name,
                customer_email: booking.customer_email,
                customer_phone: booking.customer_phone,
                check_in_date: booking.check_in_date,
                check_out_date: booking.check_out_date,
                number_of_guests: booking.number_of_guests,
                room_type: booking.room_type,
                price_per_night: booking.price_per_night,
                total_price: booking.total_price,
                status: BookingStatus::Pending,
                special_requests: booking.special_requests,
                created_at: Some(created_at),
            })
        })
    }

    fn find_by_id(&self, booking_id: &str) -> BoxFuture<'_, Option<Booking>, DbError> {
        let db = self.db_client.clone();
        let booking_id = booking_id.to_string();
        Box::pin(async move {
            let query = format!("SELECT {} FROM bookings WHERE id = $1", SELECT_COLUMNS);

            let row = sqlx::query(&query)
                .bind(&booking_id)
                .fetch_optional(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to find booking: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            row.as_ref().map(map_row).transpose()
        })
    }

    fn update_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
    ) -> BoxFuture<'_, Option<Booking>, DbError> {
        let db = self.db_client.clone();
        let booking_id = booking_id.to_string();
        Box::pin(async move {
            debug!(booking_id = %booking_id, status = %status, "Updating booking status");

            let result = sqlx::query("UPDATE bookings SET status = $1 WHERE id = $2")
                .bind(status.as_str())
                .bind(&booking_id)
                .execute(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to update booking status: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            if result.rows_affected() == 0 {
                return Ok(None);
            }

            let query = format!("SELECT {} FROM bookings WHERE id = $1", SELECT_COLUMNS);
            let row = sqlx::query(&query)
                .bind(&booking_id)
                .fetch_optional(db.pool())
                .await
                .map_err(|e| DbError::QueryError(e.to_string()))?;

            row.as_ref().map(map_row).transpose()
        })
    }

    fn find_pending_by_provider(&self, provider_id: &str) -> BoxFuture<'_, Vec<Booking>, DbError> {
        let db = self.db_client.clone();
        let provider_id = provider_id.to_string();
        Box::pin(async move {
            let query = format!(
                "SELECT {} FROM bookings WHERE provider_id = $1 AND status = 'pending' ORDER BY created_at DESC",
                SELECT_COLUMNS
            );

            let rows = sqlx::query(&query)
                .bind(&provider_id)
                .fetch_all(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to list provider bookings: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            rows.iter().map(map_row).collect()
        })
    }

    fn find_by_customer(&self, user_id: &str) -> BoxFuture<'_, Vec<Booking>, DbError> {
        let db = self.db_client.clone();
        let user_id = user_id.to_string();
        Box::pin(async move {
            let query = format!(
                "SELECT {} FROM bookings WHERE customer_user_id = $1 ORDER BY created_at DESC",
                SELECT_COLUMNS
            );

            let rows = sqlx::query(&query)
                .bind(&user_id)
                .fetch_all(db.pool())
                .await
                .map_err(|e| {
                    error!("Failed to list customer bookings: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            rows.iter().map(map_row).collect()
        })
    }
}
