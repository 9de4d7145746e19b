//! Resource directory
//!
//! The listing catalog is owned by another part of the system; booking
//! creation only needs to resolve a resource id to its name and provider.

use crate::error::DbError;
use serde::{Deserialize, Serialize};
use travelwish_common::services::BoxFuture;

/// The subset of a listing needed to create a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub id: String,
    pub name: String,
    pub provider_id: String,
    pub provider_email: Option<String>,
}

/// Lookup of bookable resources.
pub trait ResourceDirectory: Send + Sync {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError>;

    fn find_by_id(&self, resource_id: &str) -> BoxFuture<'_, Option<ResourceSummary>, DbError>;
}
