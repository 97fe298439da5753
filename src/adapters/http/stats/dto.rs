//! Response bodies for the statistics endpoints.

use serde::Serialize;

use crate::application::StatsView;
use crate::domain::stats::StatsSnapshot;

/// Snapshot body plus a flag marking a last-known-good answer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub snapshot: StatsSnapshot,
    /// True when the store could not be read and an older snapshot is served.
    pub stale: bool,
}

impl From<StatsView> for StatsResponse {
    fn from(view: StatsView) -> Self {
        Self {
            snapshot: (*view.snapshot).clone(),
            stale: view.stale,
        }
    }
}
