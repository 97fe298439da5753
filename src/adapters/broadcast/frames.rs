//! Serialized frames queued for subscribers.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::orders::{OrderEvent, OrderEventType};

/// An event serialized once and shared by every subscriber queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundFrame {
    /// Event log position; `None` for hub-originated events.
    pub sequence: Option<u64>,
    pub event_type: OrderEventType,
    /// JSON body of the event.
    pub data: Arc<str>,
}

impl OutboundFrame {
    /// Serializes an event into a frame.
    ///
    /// # Errors
    ///
    /// Returns a `MalformedEvent` error if the event cannot be rendered.
    pub fn encode(event: &OrderEvent, sequence: Option<u64>) -> Result<Self, DomainError> {
        let data = serde_json::to_string(event).map_err(DomainError::malformed_event)?;
        Ok(Self {
            sequence,
            event_type: event.event_type,
            data: Arc::from(data),
        })
    }
}
