// --- File: crates/travelwish_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Database Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. DATABASE_URL loaded via TW_DATABASE__URL or DATABASE_URL
}

// --- Card Gateway Config ---
// Holds non-secret gateway config. Secret key loaded directly from env var:
// GATEWAY_SECRET_KEY
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GatewayConfig {
    pub api_base_url: Option<String>, // defaults to the hosted gateway API
    pub default_currency: Option<String>, // defaults to "lkr"
}

// --- Mail Relay Config ---
// Relay API key loaded directly from env var: MAIL_RELAY_API_KEY
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MailConfig {
    pub relay_url: String,
    pub from_address: String,
    pub dashboard_url: Option<String>, // linked from provider emails
}

// --- Push (FCM) Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PushConfig {
    pub project_id: Option<String>,
    pub key_path: Option<String>, // service account key file
}

// --- Notification Config ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct NotifyConfig {
    /// Capacity of the in-process provider dashboard feed.
    pub feed_capacity: Option<usize>,
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // Error details are only echoed to clients in development mode.
    #[serde(default)]
    pub development: bool,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_payments: bool,
    #[serde(default)]
    pub use_mail: bool,
    #[serde(default)]
    pub use_push: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub database: Option<DatabaseConfig>, // Central DB config
    #[serde(default)]
    pub gateway: Option<GatewayConfig>,
    #[serde(default)]
    pub mail: Option<MailConfig>,
    #[serde(default)]
    pub push: Option<PushConfig>,
    #[serde(default)]
    pub notify: Option<NotifyConfig>,
}
