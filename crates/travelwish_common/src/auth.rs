// --- File: crates/travelwish_common/src/auth.rs ---
//! Authenticated-user extraction.
//!
//! Authentication itself happens upstream (a middleware or gateway verifies
//! the session and inserts an [`AuthenticatedUser`] into request extensions).
//! Handlers declare the extractor and get a 401 envelope automatically when
//! no user context is present.

use crate::error::TravelWishError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// The user identity attached to an authenticated request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| TravelWishError::Unauthenticated.into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn missing_user_rejects_with_401() {
        let request = Request::builder().uri("/").body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        let result = AuthenticatedUser::from_request_parts(&mut parts, &()).await;
        let response = result.err().expect("extraction should fail");
        assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn present_user_is_extracted() {
        let request = Request::builder().uri("/").body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        parts.extensions.insert(AuthenticatedUser {
            id: "u1".into(),
            email: "traveler@example.com".into(),
            full_name: "Test Traveler".into(),
        });
        let user = AuthenticatedUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(user.id, "u1");
    }
}
