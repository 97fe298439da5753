//! HTTP adapters - axum routes for the admin dashboard and the internal
//! order-event intake.

mod error;
pub mod health;
pub mod order_events;
mod router;
pub mod stats;
pub mod stream;

pub use error::ErrorResponse;
pub use router::{build_router, AppState};
