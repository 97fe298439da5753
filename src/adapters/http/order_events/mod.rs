//! Internal order-event intake used by the order write path.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{OrderEventRequest, RecordedEventResponse};
pub use handlers::{OrderEventsApiError, OrderEventsAppState};
pub use routes::order_event_routes;
