//! HTTP routes for dashboard statistics.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{get_stats, refresh_stats, StatsAppState};

/// Creates the stats router.
pub fn stats_routes(state: StatsAppState) -> Router {
    Router::new()
        // GET /api/admin/stats
        .route("/api/admin/stats", get(get_stats))
        // POST /api/admin/stats/refresh
        .route("/api/admin/stats/refresh", post(refresh_stats))
        .with_state(state)
}
