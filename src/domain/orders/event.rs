//! Order events pushed to dashboard subscribers.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::foundation::{DomainError, OrderId, SubscriberId, Timestamp};

use super::LineItem;

/// Kind of event carried on the live stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderEventType {
    Connected,
    Heartbeat,
    OrderCreated,
    OrderStatusChanged,
}

impl OrderEventType {
    /// Wire name of the event type.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderEventType::Connected => "connected",
            OrderEventType::Heartbeat => "heartbeat",
            OrderEventType::OrderCreated => "order_created",
            OrderEventType::OrderStatusChanged => "order_status_changed",
        }
    }

    /// True for events that originate from an order mutation and belong in
    /// the event log. Connected and Heartbeat are produced by the hub.
    pub fn is_order_mutation(&self) -> bool {
        matches!(
            self,
            OrderEventType::OrderCreated | OrderEventType::OrderStatusChanged
        )
    }
}

/// A single notification on the live stream. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEvent {
    #[serde(rename = "type")]
    pub event_type: OrderEventType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub order_id: Option<OrderId>,
    pub payload: JsonValue,
    pub timestamp: Timestamp,
}

/// Payload of an `order_created` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedData {
    pub status: String,
    pub total: f64,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

/// Payload of an `order_status_changed` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangedData {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub previous_status: Option<String>,
    pub status: String,
}

impl OrderEvent {
    /// First event a subscriber sees after connecting.
    pub fn connected(subscriber_id: &SubscriberId, at: Timestamp) -> Self {
        Self {
            event_type: OrderEventType::Connected,
            order_id: None,
            payload: serde_json::json!({ "subscriberId": subscriber_id.to_string() }),
            timestamp: at,
        }
    }

    /// Keepalive carrying only the current time.
    pub fn heartbeat(at: Timestamp) -> Self {
        Self {
            event_type: OrderEventType::Heartbeat,
            order_id: None,
            payload: JsonValue::Object(Default::default()),
            timestamp: at,
        }
    }

    /// Event for a newly created order.
    pub fn order_created(
        order_id: OrderId,
        data: &OrderCreatedData,
        at: Timestamp,
    ) -> Result<Self, DomainError> {
        let payload = serde_json::to_value(data).map_err(DomainError::malformed_event)?;
        Ok(Self {
            event_type: OrderEventType::OrderCreated,
            order_id: Some(order_id),
            payload,
            timestamp: at,
        })
    }

    /// Event for an order whose status moved.
    pub fn order_status_changed(
        order_id: OrderId,
        data: &StatusChangedData,
        at: Timestamp,
    ) -> Result<Self, DomainError> {
        let payload = serde_json::to_value(data).map_err(DomainError::malformed_event)?;
        Ok(Self {
            event_type: OrderEventType::OrderStatusChanged,
            order_id: Some(order_id),
            payload,
            timestamp: at,
        })
    }
}

/// An event together with its position in the global append order.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedEvent {
    pub sequence: u64,
    pub event: OrderEvent,
}
