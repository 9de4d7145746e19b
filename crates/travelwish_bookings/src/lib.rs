//! Booking lifecycle for TravelWish.
//!
//! Bookings move through an explicit state machine
//! (`pending → confirmed | rejected | cancelled`,
//! `confirmed → cancelled | completed`) and every successful status change
//! fans out exactly one customer notification through the injected
//! dispatcher. Fan-out is best-effort and never fails a booking operation.

pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod routes;

pub use error::BookingError;
pub use handlers::BookingState;
pub use routes::routes;
