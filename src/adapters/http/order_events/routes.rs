//! HTTP routes for order-event intake.

use axum::routing::post;
use axum::Router;

use super::handlers::{record_order_event, OrderEventsAppState};

pub fn order_event_routes(state: OrderEventsAppState) -> Router {
    Router::new()
        // POST /internal/orders/events
        .route("/internal/orders/events", post(record_order_event))
        .with_state(state)
}
