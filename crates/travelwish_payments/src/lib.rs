//! Payment orchestration for TravelWish.
//!
//! Wraps the card gateway adapter with the marketplace's payment flows:
//! new-card intents, confirm-time card vaulting, saved-card charges with
//! drift repair, payment history, and the card vault CRUD. Amounts enter in
//! major units and are converted to minor units at this boundary.

pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod routes;

pub use error::PaymentError;
pub use handlers::PaymentState;
pub use routes::routes;
