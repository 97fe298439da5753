//! HTTP handlers for dashboard statistics.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::adapters::http::ErrorResponse;
use crate::application::{StatsError, StatsService, StatsView};

use super::dto::StatsResponse;

/// Stats API error that implements IntoResponse.
#[derive(Debug)]
pub struct StatsApiError(pub StatsError);

impl From<StatsError> for StatsApiError {
    fn from(err: StatsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for StatsApiError {
    fn into_response(self) -> Response {
        let StatsApiError(err) = self;
        tracing::warn!(error = %err, "Stats request failed");
        match &err {
            StatsError::SourceUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::service_unavailable(err.code(), err.to_string())),
            )
                .into_response(),
        }
    }
}

/// Shared state for the stats endpoints.
#[derive(Clone)]
pub struct StatsAppState {
    pub service: Arc<StatsService>,
}

/// GET /api/admin/stats
///
/// Returns the cached snapshot when fresh, otherwise recomputes. Falls back
/// to the last good snapshot with `stale: true` if the store is unreachable.
pub async fn get_stats(
    State(state): State<StatsAppState>,
) -> Result<Json<StatsResponse>, StatsApiError> {
    let view = state.service.current().await?;
    Ok(Json(view.into()))
}

/// POST /api/admin/stats/refresh
///
/// Forces a recomputation. Fails instead of serving a stale snapshot.
pub async fn refresh_stats(
    State(state): State<StatsAppState>,
) -> Result<Json<StatsResponse>, StatsApiError> {
    let snapshot = state.service.refresh().await?;
    Ok(Json(
        StatsView {
            snapshot,
            stale: false,
        }
        .into(),
    ))
}
