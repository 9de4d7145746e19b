//! Card gateway adapter for TravelWish.
//!
//! Talks to a Stripe-style REST API with form-encoded request bodies and
//! basic-auth using the secret key from the environment. The adapter's job is
//! to classify raw gateway responses into the
//! [`GatewayError`](travelwish_common::services::GatewayError) taxonomy so the
//! payment orchestration layer never inspects gateway message strings.

pub mod logic;
pub mod service;

pub use service::StripeGatewayService;
