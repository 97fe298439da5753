//! StatsService - Current snapshot with staleness-based reuse.
//!
//! The current snapshot is an `Arc<StatsSnapshot>` swapped under a short
//! write lock, so readers see either the previous or the new snapshot whole.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::Timestamp;
use crate::domain::stats::StatsSnapshot;

use super::{StatsAggregator, StatsError};

/// A snapshot as served to a dashboard.
#[derive(Debug, Clone)]
pub struct StatsView {
    pub snapshot: Arc<StatsSnapshot>,
    /// True when a recomputation failed and this is the last good snapshot.
    pub stale: bool,
}

/// Holds the most recently completed snapshot.
pub struct StatsService {
    aggregator: StatsAggregator,
    current: RwLock<Option<Arc<StatsSnapshot>>>,
    max_staleness: Duration,
}

impl StatsService {
    /// `max_staleness` of zero recomputes on every request.
    pub fn new(aggregator: StatsAggregator, max_staleness: Duration) -> Self {
        Self {
            aggregator,
            current: RwLock::new(None),
            max_staleness,
        }
    }

    /// The cached snapshot, if any computation has completed.
    pub fn cached(&self) -> Option<Arc<StatsSnapshot>> {
        self.current.read().clone()
    }

    /// Age of the cached snapshot.
    pub fn snapshot_age(&self, now: Timestamp) -> Option<chrono::Duration> {
        self.cached().map(|snapshot| snapshot.age(now))
    }

    /// Recomputes and publishes a new snapshot.
    ///
    /// When concurrent refreshes race, the snapshot with the latest
    /// `generated_at` stays current.
    pub async fn refresh(&self) -> Result<Arc<StatsSnapshot>, StatsError> {
        let snapshot = Arc::new(self.aggregator.compute(Timestamp::now()).await?);
        self.publish(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Serves the cached snapshot while fresh, otherwise recomputes.
    ///
    /// If recomputation fails and a previous snapshot exists, that snapshot
    /// is returned marked stale.
    ///
    /// # Errors
    ///
    /// `StatsError::SourceUnavailable` when the store fails and nothing has
    /// been computed yet.
    pub async fn current(&self) -> Result<StatsView, StatsError> {
        if let Some(snapshot) = self.cached() {
            if self.is_fresh(&snapshot, Timestamp::now()) {
                return Ok(StatsView {
                    snapshot,
                    stale: false,
                });
            }
        }

        match self.refresh().await {
            Ok(snapshot) => Ok(StatsView {
                snapshot,
                stale: false,
            }),
            Err(err) => match self.cached() {
                Some(snapshot) => {
                    tracing::warn!(
                        code = %err.code(),
                        error = %err,
                        generated_at = %snapshot.generated_at.to_rfc3339(),
                        "Serving last known good stats snapshot"
                    );
                    Ok(StatsView {
                        snapshot,
                        stale: true,
                    })
                }
                None => Err(err),
            },
        }
    }

    fn is_fresh(&self, snapshot: &StatsSnapshot, now: Timestamp) -> bool {
        if self.max_staleness.is_zero() {
            return false;
        }
        match snapshot.age(now).to_std() {
            Ok(age) => age <= self.max_staleness,
            // Generated after `now` by a concurrent refresh.
            Err(_) => true,
        }
    }

    fn publish(&self, snapshot: Arc<StatsSnapshot>) {
        let mut current = self.current.write();
        let newer = current
            .as_ref()
            .map_or(true, |existing| snapshot.generated_at >= existing.generated_at);
        if newer {
            *current = Some(snapshot);
        } else {
            tracing::debug!("Discarding out-of-order stats snapshot");
        }
    }
}
