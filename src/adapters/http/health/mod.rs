//! Liveness endpoint with broadcast and snapshot vitals.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::adapters::broadcast::BroadcastHub;
use crate::application::StatsService;
use crate::domain::foundation::Timestamp;

#[derive(Clone)]
pub struct HealthAppState {
    pub hub: Arc<BroadcastHub>,
    pub stats: Arc<StatsService>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub subscribers: usize,
    pub latest_sequence: u64,
    /// Seconds since the current snapshot was generated, if one exists.
    pub snapshot_age_secs: Option<i64>,
}

/// GET /health
pub async fn health(State(state): State<HealthAppState>) -> Json<HealthResponse> {
    let snapshot_age_secs = state
        .stats
        .snapshot_age(Timestamp::now())
        .map(|age| age.num_seconds());

    Json(HealthResponse {
        status: "ok",
        subscribers: state.hub.subscriber_count(),
        latest_sequence: state.hub.latest_sequence(),
        snapshot_age_secs,
    })
}

pub fn health_routes(state: HealthAppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(state)
}
