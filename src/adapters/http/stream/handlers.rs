//! SSE handler connecting a dashboard client to the broadcast hub.
//!
//! The response body is the subscriber's drain task: it forwards frames from
//! the bounded queue to the connection. When the client goes away the body
//! is dropped, which unregisters the subscriber.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::stream::{self, Stream, StreamExt};

use crate::adapters::broadcast::{BroadcastHub, OutboundFrame, RegistryError};
use crate::adapters::http::ErrorResponse;
use crate::domain::foundation::ErrorCode;

// ════════════════════════════════════════════════════════════════════════════════
// Error Type
// ════════════════════════════════════════════════════════════════════════════════

/// Stream API error that implements IntoResponse.
#[derive(Debug)]
pub enum StreamApiError {
    /// Registry refused the connection; clients retry after the hint.
    CapacityExceeded { message: String, retry_after: Duration },
    Internal(String),
}

impl IntoResponse for StreamApiError {
    fn into_response(self) -> Response {
        match self {
            StreamApiError::CapacityExceeded {
                message,
                retry_after,
            } => {
                let body = ErrorResponse::service_unavailable(ErrorCode::CapacityExceeded, message);
                let mut response = (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
                let secs = retry_after.as_secs().max(1);
                if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                    response.headers_mut().insert(header::RETRY_AFTER, value);
                }
                response
            }
            StreamApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(message)),
            )
                .into_response(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the stream endpoint.
#[derive(Clone)]
pub struct StreamAppState {
    pub hub: Arc<BroadcastHub>,
    /// Reconnect delay sent to clients as the leading `retry:` directive.
    pub client_retry: Duration,
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/orders/stream
///
/// Streams `retry: <ms>`, then the `connected` event, then order events and
/// heartbeats until the client disconnects or the service shuts down.
pub async fn stream_orders(
    State(state): State<StreamAppState>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, StreamApiError> {
    let subscription = state.hub.connect().map_err(|err| match err {
        RegistryError::CapacityExceeded { .. } => StreamApiError::CapacityExceeded {
            message: err.to_string(),
            retry_after: state.client_retry,
        },
        RegistryError::DuplicateSubscriber(_) => StreamApiError::Internal(err.to_string()),
    })?;

    let retry = stream::once(futures::future::ready(Ok(
        Event::default().retry(state.client_retry)
    )));
    let frames = subscription
        .into_stream()
        .map(|frame| Ok::<_, Infallible>(sse_event(&frame)));

    Ok(Sse::new(retry.chain(frames)))
}

/// Renders a frame as an SSE message. Log events carry their sequence as
/// the message id.
pub fn sse_event(frame: &OutboundFrame) -> Event {
    let event = Event::default().data(&*frame.data);
    match frame.sequence {
        Some(sequence) => event.id(sequence.to_string()),
        None => event,
    }
}
