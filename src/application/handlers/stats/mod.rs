//! Dashboard statistics: aggregation, snapshot caching, and background refresh.
//!
//! - `StatsAggregator` - Runs the store queries and assembles a snapshot
//! - `StatsService` - Holds the current snapshot and applies the staleness
//!   policy for pull requests
//! - `StatsRefresher` - Background task recomputing on a fixed cadence

mod engine;
mod refresher;
mod service;

pub use engine::{AggregationSettings, StatsAggregator};
pub use refresher::StatsRefresher;
pub use service::{StatsService, StatsView};

use crate::domain::foundation::ErrorCode;
use crate::ports::StoreError;

/// Errors from computing a statistics snapshot.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StatsError {
    #[error("Aggregation source unavailable: {0}")]
    SourceUnavailable(#[from] StoreError),
}

impl StatsError {
    pub fn code(&self) -> ErrorCode {
        match self {
            StatsError::SourceUnavailable(_) => ErrorCode::AggregationSourceUnavailable,
        }
    }
}
