//! StatsRefresher - Background service recomputing the stats snapshot.
//!
//! Refreshes once immediately, then every `interval` until the shutdown
//! signal. A failed refresh leaves the previous snapshot in place.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::StatsService;

/// Background service driving `StatsService::refresh`.
pub struct StatsRefresher {
    service: Arc<StatsService>,
    interval: Duration,
}

impl StatsRefresher {
    pub fn new(service: Arc<StatsService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Run the refresh loop until shutdown signal is received.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("Stats refresher stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    self.refresh_once().await;
                }
            }
        }
    }

    /// Run exactly one refresh (for testing). Returns true on success.
    pub async fn refresh_once(&self) -> bool {
        let started = Instant::now();
        match self.service.refresh().await {
            Ok(snapshot) => {
                tracing::debug!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    total_orders = snapshot.overview.total_orders,
                    degraded = snapshot.is_degraded(),
                    "Stats snapshot refreshed"
                );
                true
            }
            Err(err) => {
                tracing::warn!(code = %err.code(), error = %err, "Stats refresh failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::stats::StatsAggregator;

    fn refresher(store: Arc<InMemoryStore>) -> (StatsRefresher, Arc<StatsService>) {
        let service = Arc::new(StatsService::new(
            StatsAggregator::new(store),
            Duration::from_secs(30),
        ));
        (
            StatsRefresher::new(service.clone(), Duration::from_secs(60)),
            service,
        )
    }

    #[tokio::test]
    async fn test_refresh_once_populates_cache() {
        let (refresher, service) = refresher(Arc::new(InMemoryStore::new()));

        assert!(refresher.refresh_once().await);
        assert!(service.cached().is_some());
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_nothing_cached() {
        let store = Arc::new(InMemoryStore::new());
        store.set_unavailable(true);
        let (refresher, service) = refresher(store);

        assert!(!refresher.refresh_once().await);
        assert!(service.cached().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_refreshes_immediately_and_stops_on_shutdown() {
        let (refresher, service) = refresher(Arc::new(InMemoryStore::new()));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move { refresher.run(shutdown_rx).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(service.cached().is_some());

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
