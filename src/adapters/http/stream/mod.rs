//! Live order-event stream HTTP adapter (Server-Sent Events).

pub mod handlers;
pub mod routes;

pub use handlers::StreamAppState;
pub use routes::stream_routes;
