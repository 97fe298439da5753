//! HTTP routes for the live order stream.

use axum::routing::get;
use axum::Router;

use super::handlers::{stream_orders, StreamAppState};

/// Creates the stream router. It is mounted outside the request timeout.
pub fn stream_routes(state: StreamAppState) -> Router {
    Router::new()
        // GET /api/admin/orders/stream
        .route("/api/admin/orders/stream", get(stream_orders))
        .with_state(state)
}
