// --- File: crates/travelwish_notify/src/push.rs ---
//! Push notification client (FCM HTTP v1 style).
//!
//! Authenticates with a Google service-account key file and sends one message
//! per device token. The key file path comes from config; the file itself is
//! never checked in.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use travelwish_common::http::client::get_client;
use travelwish_config::PushConfig;
use yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator};

const MESSAGING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

/// Errors that can occur when sending a push notification.
#[derive(Error, Debug)]
pub enum PushError {
    #[error("Push authentication error: {0}")]
    AuthError(String),

    #[error("HTTP request to push service failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Push configuration missing: {0}")]
    ConfigError(String),

    #[error("Push API error: {0}")]
    ApiError(String),
}

/// Top-level FCM v1 request wrapper.
#[derive(Debug, Serialize)]
pub struct PushMessage {
    pub message: Message,
}

#[derive(Debug, Serialize)]
pub struct Message {
    /// Registration token of the target device.
    pub token: String,
    pub notification: Notification,
    /// Custom key-value payload delivered to the client app.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<HashMap<String, String>>,
}

#[derive(Debug, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    /// `projects/{project_id}/messages/{message_id}`
    name: String,
}

/// Obtains an OAuth2 access token for the messaging API from the configured
/// service-account key file.
async fn get_push_auth_token(config: &PushConfig) -> Result<String, PushError> {
    let key_path = config
        .key_path
        .as_deref()
        .ok_or_else(|| PushError::ConfigError("Missing key_path in push config".to_string()))?;

    let sa_key = read_service_account_key(Path::new(key_path))
        .await
        .map_err(|e| PushError::AuthError(e.to_string()))?;

    let auth = ServiceAccountAuthenticator::builder(sa_key)
        .build()
        .await
        .map_err(|e| PushError::AuthError(e.to_string()))?;

    let auth_token = auth
        .token(&[MESSAGING_SCOPE])
        .await
        .map_err(|e| PushError::AuthError(e.to_string()))?;

    match auth_token.token() {
        Some(token) => Ok(token.to_string()),
        None => Err(PushError::AuthError("No token available".to_string())),
    }
}

/// Client for the push messaging API.
pub struct PushClient {
    config: PushConfig,
}

impl PushClient {
    pub fn new(config: PushConfig) -> Self {
        Self { config }
    }

    /// Sends one notification to one device token, returning the message id.
    pub async fn send(
        &self,
        token: &str,
        title: &str,
        body: &str,
        data: Option<HashMap<String, String>>,
    ) -> Result<String, PushError> {
        let project_id = self.config.project_id.as_deref().ok_or_else(|| {
            PushError::ConfigError("Missing project_id in push config".to_string())
        })?;

        let url = format!(
            "https://fcm.googleapis.com/v1/projects/{}/messages:send",
            project_id
        );

        let auth_token = get_push_auth_token(&self.config).await?;

        let message = PushMessage {
            message: Message {
                token: token.to_string(),
                notification: Notification {
                    title: title.to_string(),
                    body: body.to_string(),
                },
                data,
            },
        };

        debug!(title = %title, "Sending push notification");
        let response = get_client()
            .post(&url)
            .bearer_auth(auth_token)
            .json(&message)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(PushError::ApiError(error_text));
        }

        let push_response: PushResponse = response.json().await?;
        Ok(push_response.name)
    }
}

/// Object-safe push sender so the push channel can be tested without the
/// real messaging API.
pub trait PushSender: Send + Sync {
    fn send_to_token(
        &self,
        token: &str,
        title: &str,
        body: &str,
        data: Option<HashMap<String, String>>,
    ) -> travelwish_common::services::BoxFuture<'_, String, PushError>;
}

impl PushSender for PushClient {
    fn send_to_token(
        &self,
        token: &str,
        title: &str,
        body: &str,
        data: Option<HashMap<String, String>>,
    ) -> travelwish_common::services::BoxFuture<'_, String, PushError> {
        let token = token.to_string();
        let title = title.to_string();
        let body = body.to_string();
        Box::pin(async move { self.send(&token, &title, &body, data).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_in_v1_shape() {
        let message = PushMessage {
            message: Message {
                token: "tok_1".to_string(),
                notification: Notification {
                    title: "Booking Confirmed!".to_string(),
                    body: "Your stay is confirmed".to_string(),
                },
                data: None,
            },
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["message"]["token"], "tok_1");
        assert_eq!(value["message"]["notification"]["title"], "Booking Confirmed!");
        // `data` is omitted entirely when absent
        assert!(value["message"].get("data").is_none());
    }
}
