//! Repository for push device tokens
//!
//! Tokens are globally unique: re-registering an existing token reassigns it
//! to the new owner (device handed to another account) and reactivates it.

use crate::error::DbError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use travelwish_common::services::BoxFuture;

/// Supported mobile platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePlatform {
    Ios,
    Android,
}

impl DevicePlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            DevicePlatform::Ios => "ios",
            DevicePlatform::Android => "android",
        }
    }
}

impl fmt::Display for DevicePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DevicePlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ios" => Ok(DevicePlatform::Ios),
            "android" => Ok(DevicePlatform::Android),
            other => Err(format!("Unknown platform: {}", other)),
        }
    }
}

/// A registered device token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceToken {
    pub id: String,
    pub user_id: String,
    pub token: String,
    pub platform: DevicePlatform,
    pub device_id: String,
    pub is_active: bool,
    pub last_used: Option<String>,
}

/// Repository for device tokens.
pub trait DeviceTokenRepository: Send + Sync {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError>;

    /// Register a token. If the token already exists it is reassigned to the
    /// given user/platform/device and reactivated; otherwise a new row is
    /// created. Returns the stored token and `true` when it was newly created.
    fn register(
        &self,
        user_id: &str,
        token: &str,
        platform: DevicePlatform,
        device_id: &str,
    ) -> BoxFuture<'_, (DeviceToken, bool), DbError>;

    /// Mark a token inactive. Returns `false` when the token is unknown.
    fn deactivate_by_token(&self, token: &str) -> BoxFuture<'_, bool, DbError>;

    /// Active tokens for a user (push fan-out targets).
    fn find_active_by_user(&self, user_id: &str) -> BoxFuture<'_, Vec<DeviceToken>, DbError>;

    /// All tokens for a user, active or not (admin listing).
    fn find_by_user(&self, user_id: &str) -> BoxFuture<'_, Vec<DeviceToken>, DbError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parses_known_values_only() {
        assert_eq!("ios".parse::<DevicePlatform>().unwrap(), DevicePlatform::Ios);
        assert_eq!(
            "android".parse::<DevicePlatform>().unwrap(),
            DevicePlatform::Android
        );
        assert!("web".parse::<DevicePlatform>().is_err());
    }
}
