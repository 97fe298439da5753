//! RecordOrderEventHandler - Command handler appending order mutations to
//! the event log.
//!
//! Called by the order write path after a successful create or status
//! change. Publication is fire-and-forget: failures are logged and the
//! caller's mutation is never failed because of the broadcast side.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, OrderId, Timestamp};
use crate::domain::orders::{LineItem, OrderCreatedData, OrderEvent, StatusChangedData};
use crate::ports::EventPublisher;

/// Command recorded after an order is created.
#[derive(Debug, Clone)]
pub struct RecordOrderCreatedCommand {
    pub order_id: OrderId,
    pub status: String,
    pub total: f64,
    pub items: Vec<LineItem>,
}

impl RecordOrderCreatedCommand {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.status.trim().is_empty() {
            return Err(DomainError::validation("status", "Status cannot be empty"));
        }
        if !self.total.is_finite() || self.total < 0.0 {
            return Err(DomainError::validation(
                "total",
                "Total must be a non-negative number",
            ));
        }
        Ok(())
    }
}

/// Command recorded after an order's status changes.
#[derive(Debug, Clone)]
pub struct RecordOrderStatusChangedCommand {
    pub order_id: OrderId,
    pub previous_status: Option<String>,
    pub status: String,
}

impl RecordOrderStatusChangedCommand {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.status.trim().is_empty() {
            return Err(DomainError::validation("status", "Status cannot be empty"));
        }
        Ok(())
    }
}

/// Handler turning order mutations into OrderEvents.
pub struct RecordOrderEventHandler {
    publisher: Arc<dyn EventPublisher>,
}

impl RecordOrderEventHandler {
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        Self { publisher }
    }

    /// Publishes an `order_created` event. Returns the sequence number, or
    /// `None` if the event was not published.
    pub async fn order_created(&self, cmd: RecordOrderCreatedCommand) -> Option<u64> {
        let data = OrderCreatedData {
            status: cmd.status,
            total: cmd.total,
            items: cmd.items,
        };
        let event = OrderEvent::order_created(cmd.order_id, &data, Timestamp::now());
        self.publish(event).await
    }

    /// Publishes an `order_status_changed` event.
    pub async fn order_status_changed(&self, cmd: RecordOrderStatusChangedCommand) -> Option<u64> {
        let data = StatusChangedData {
            previous_status: cmd.previous_status,
            status: cmd.status,
        };
        let event = OrderEvent::order_status_changed(cmd.order_id, &data, Timestamp::now());
        self.publish(event).await
    }

    async fn publish(&self, event: Result<OrderEvent, DomainError>) -> Option<u64> {
        let event = match event {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(code = %err.code, error = %err, "Order event not built");
                return None;
            }
        };

        let event_type = event.event_type.as_str();
        let order_id = event.order_id.as_ref().map(ToString::to_string);
        match self.publisher.publish(event).await {
            Ok(sequence) => {
                tracing::debug!(sequence, event_type, order_id = ?order_id, "Order event recorded");
                Some(sequence)
            }
            Err(err) => {
                tracing::warn!(
                    event_type,
                    order_id = ?order_id,
                    error = %err,
                    "Order event dropped"
                );
                None
            }
        }
    }
}
