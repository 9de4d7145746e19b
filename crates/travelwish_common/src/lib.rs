// --- File: crates/travelwish_common/src/lib.rs ---
//! Shared foundation for the TravelWish backend workspace: the error
//! taxonomy and HTTP envelope, the object-safe service traits feature
//! crates implement, the shared outbound HTTP client, and logging setup.

pub mod auth;
pub mod error;
pub mod http;
pub mod logging;
pub mod services;

pub use auth::AuthenticatedUser;
pub use error::{HttpStatusCode, TravelWishError};
pub use http::client::{get_client, HTTP_CLIENT};
