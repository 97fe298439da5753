//! Request and response bodies for order-event intake.

use serde::{Deserialize, Serialize};

use crate::application::{RecordOrderCreatedCommand, RecordOrderStatusChangedCommand};
use crate::domain::foundation::{DomainError, OrderId, ProductId};
use crate::domain::orders::LineItem;

/// An order mutation reported by the write path, tagged by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEventRequest {
    OrderCreated(OrderCreatedRequest),
    OrderStatusChanged(OrderStatusChangedRequest),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedRequest {
    pub order_id: String,
    pub status: String,
    pub total: f64,
    #[serde(default)]
    pub items: Vec<LineItemRequest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusChangedRequest {
    pub order_id: String,
    #[serde(default)]
    pub previous_status: Option<String>,
    pub status: String,
}

impl TryFrom<OrderCreatedRequest> for RecordOrderCreatedCommand {
    type Error = DomainError;

    fn try_from(req: OrderCreatedRequest) -> Result<Self, Self::Error> {
        let items = req
            .items
            .into_iter()
            .map(|item| -> Result<LineItem, DomainError> {
                Ok(LineItem {
                    product_id: ProductId::new(item.product_id)?,
                    quantity: item.quantity,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        let cmd = RecordOrderCreatedCommand {
            order_id: OrderId::new(req.order_id)?,
            status: req.status,
            total: req.total,
            items,
        };
        cmd.validate()?;
        Ok(cmd)
    }
}

impl TryFrom<OrderStatusChangedRequest> for RecordOrderStatusChangedCommand {
    type Error = DomainError;

    fn try_from(req: OrderStatusChangedRequest) -> Result<Self, Self::Error> {
        let cmd = RecordOrderStatusChangedCommand {
            order_id: OrderId::new(req.order_id)?,
            previous_status: req.previous_status,
            status: req.status,
        };
        cmd.validate()?;
        Ok(cmd)
    }
}

/// Sequence assigned to the recorded event, absent when publication failed.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedEventResponse {
    pub sequence: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_request_parses_tagged_body() {
        let body = r#"{"type":"order_created","orderId":"ord-1","status":"pending","total":150.0,
            "items":[{"productId":"p-1","quantity":2}]}"#;
        let req: OrderEventRequest = serde_json::from_str(body).unwrap();

        let OrderEventRequest::OrderCreated(created) = req else {
            panic!("expected order_created");
        };
        let cmd = RecordOrderCreatedCommand::try_from(created).unwrap();
        assert_eq!(cmd.order_id.as_str(), "ord-1");
        assert_eq!(cmd.items[0].quantity, 2);
    }

    #[test]
    fn blank_order_id_is_rejected() {
        let req = OrderStatusChangedRequest {
            order_id: "  ".to_string(),
            previous_status: None,
            status: "shipped".to_string(),
        };
        assert!(RecordOrderStatusChangedCommand::try_from(req).is_err());
    }

    #[test]
    fn negative_total_is_rejected() {
        let req = OrderCreatedRequest {
            order_id: "ord-2".to_string(),
            status: "pending".to_string(),
            total: -1.0,
            items: vec![],
        };
        assert!(RecordOrderCreatedCommand::try_from(req).is_err());
    }

    #[test]
    fn unknown_type_fails_to_parse() {
        let body = r#"{"type":"heartbeat","orderId":"ord-1"}"#;
        assert!(serde_json::from_str::<OrderEventRequest>(body).is_err());
    }
}
