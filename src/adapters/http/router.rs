//! Application router assembly.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::adapters::broadcast::BroadcastHub;
use crate::application::{RecordOrderEventHandler, StatsService};
use crate::config::ServerConfig;

use super::health::{health_routes, HealthAppState};
use super::order_events::{order_event_routes, OrderEventsAppState};
use super::stats::{stats_routes, StatsAppState};
use super::stream::{stream_routes, StreamAppState};

/// Everything the HTTP surface needs from the running service.
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<BroadcastHub>,
    pub stats: Arc<StatsService>,
    pub order_events: Arc<RecordOrderEventHandler>,
    pub client_retry: Duration,
}

/// Builds the full router.
///
/// The request timeout wraps every route except the event stream, which is
/// long-lived by nature.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let bounded = Router::new()
        .merge(stats_routes(StatsAppState {
            service: state.stats.clone(),
        }))
        .merge(order_event_routes(OrderEventsAppState {
            handler: state.order_events.clone(),
        }))
        .merge(health_routes(HealthAppState {
            hub: state.hub.clone(),
            stats: state.stats.clone(),
        }))
        .layer(TimeoutLayer::new(server.request_timeout()));

    let streaming = stream_routes(StreamAppState {
        hub: state.hub,
        client_retry: state.client_retry,
    });

    Router::new()
        .merge(bounded)
        .merge(streaming)
        .layer(cors_layer(&server.cors_origins_list()))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
