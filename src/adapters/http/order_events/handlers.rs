//! HTTP handler recording order mutations for broadcast.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::adapters::http::ErrorResponse;
use crate::application::RecordOrderEventHandler;
use crate::domain::foundation::DomainError;

use super::dto::{OrderEventRequest, RecordedEventResponse};

/// Order-event intake error that implements IntoResponse.
#[derive(Debug)]
pub enum OrderEventsApiError {
    BadRequest(DomainError),
}

impl From<DomainError> for OrderEventsApiError {
    fn from(err: DomainError) -> Self {
        OrderEventsApiError::BadRequest(err)
    }
}

impl IntoResponse for OrderEventsApiError {
    fn into_response(self) -> Response {
        match self {
            OrderEventsApiError::BadRequest(err) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(err))).into_response()
            }
        }
    }
}

#[derive(Clone)]
pub struct OrderEventsAppState {
    pub handler: Arc<RecordOrderEventHandler>,
}

/// POST /internal/orders/events
///
/// Accepted once validated. Publication failures are logged by the handler
/// and surface as a null sequence, never as an error to the write path.
pub async fn record_order_event(
    State(state): State<OrderEventsAppState>,
    Json(request): Json<OrderEventRequest>,
) -> Result<(StatusCode, Json<RecordedEventResponse>), OrderEventsApiError> {
    let sequence = match request {
        OrderEventRequest::OrderCreated(req) => {
            state.handler.order_created(req.try_into()?).await
        }
        OrderEventRequest::OrderStatusChanged(req) => {
            state.handler.order_status_changed(req.try_into()?).await
        }
    };

    Ok((StatusCode::ACCEPTED, Json(RecordedEventResponse { sequence })))
}
