//! Repository for push delivery records
//!
//! The push channel records one row per attempted delivery so failed sends
//! can be audited per device token.

use crate::error::DbError;
use serde::{Deserialize, Serialize};
use travelwish_common::services::BoxFuture;

/// Outcome of one push delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushStatus {
    Sent,
    Failed,
}

impl PushStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PushStatus::Sent => "sent",
            PushStatus::Failed => "failed",
        }
    }
}

/// A recorded push delivery attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushDelivery {
    pub id: String,
    pub user_id: String,
    pub device_token: String,
    pub title: String,
    pub body: String,
    pub status: PushStatus,
    pub error: Option<String>,
    pub booking_id: Option<String>,
    pub created_at: Option<String>,
}

/// Fields for recording a delivery attempt.
#[derive(Debug, Clone)]
pub struct NewPushDelivery {
    pub user_id: String,
    pub device_token: String,
    pub title: String,
    pub body: String,
    pub status: PushStatus,
    pub error: Option<String>,
    pub booking_id: Option<String>,
}

/// Repository for push delivery records.
pub trait PushDeliveryRepository: Send + Sync {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError>;

    fn record(&self, delivery: NewPushDelivery) -> BoxFuture<'_, PushDelivery, DbError>;

    /// Recent delivery records for a user, newest first.
    fn find_by_user(&self, user_id: &str) -> BoxFuture<'_, Vec<PushDelivery>, DbError>;
}
