//! Dashboard statistics HTTP adapter.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::StatsResponse;
pub use handlers::{StatsApiError, StatsAppState};
pub use routes::stats_routes;
