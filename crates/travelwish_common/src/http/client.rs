// --- File: crates/travelwish_common/src/http/client.rs ---
//! Shared HTTP client for outbound calls (gateway, mail relay, push).
//!
//! A single `reqwest::Client` is reused across the process so connection
//! pools are shared and per-call client construction is avoided.

use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

/// Lazily initialized shared HTTP client.
pub static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    create_client().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to create shared HTTP client, falling back to default");
        Client::new()
    })
});

/// Creates a new HTTP client with the standard outbound timeout.
pub fn create_client() -> Result<Client, reqwest::Error> {
    Client::builder().timeout(Duration::from_secs(30)).build()
}

/// Returns a reference to the shared HTTP client.
pub fn get_client() -> &'static Client {
    &HTTP_CLIENT
}
