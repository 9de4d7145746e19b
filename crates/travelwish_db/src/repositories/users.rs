//! Minimal user projection for payment orchestration
//!
//! Signup and login live elsewhere; the orchestrator only needs to read a
//! user's identity fields and cache the gateway customer id on first use.

use crate::error::DbError;
use serde::{Deserialize, Serialize};
use travelwish_common::services::BoxFuture;

/// The user fields visible to payment orchestration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub gateway_customer_id: Option<String>,
}

/// Read/write access to the user gateway linkage.
pub trait UserRepository: Send + Sync {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError>;

    fn find_by_id(&self, user_id: &str) -> BoxFuture<'_, Option<UserRecord>, DbError>;

    /// Cache the gateway customer id on the user record. Returns `false` when
    /// the user does not exist.
    fn set_gateway_customer_id(
        &self,
        user_id: &str,
        customer_id: &str,
    ) -> BoxFuture<'_, bool, DbError>;
}
