//! order-pulse server binary.
//!
//! Wires the event log, broadcast hub, statistics service, and HTTP router,
//! then serves until SIGINT or SIGTERM.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use order_pulse::adapters::broadcast::{BroadcastHub, HubConfig, SubscriberRegistry};
use order_pulse::adapters::events::InMemoryEventLog;
use order_pulse::adapters::http::{build_router, AppState};
use order_pulse::adapters::memory::InMemoryStore;
use order_pulse::adapters::postgres::PostgresStoreReader;
use order_pulse::application::{
    AggregationSettings, RecordOrderEventHandler, StatsAggregator, StatsRefresher, StatsService,
};
use order_pulse::config::{AppConfig, LogFormat};
use order_pulse::ports::StoreReader;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    tracing::info!(environment = ?config.server.environment, "Starting order-pulse");

    let store: Arc<dyn StoreReader> = match config.database.url() {
        Some(_) => Arc::new(PostgresStoreReader::connect(&config.database)?),
        None => {
            tracing::warn!(
                "No database URL configured, serving statistics from an empty in-memory store"
            );
            Arc::new(InMemoryStore::default())
        }
    };

    let log = Arc::new(InMemoryEventLog::new(config.broadcast.event_log_retention));
    let registry = Arc::new(SubscriberRegistry::new(
        config.broadcast.max_subscribers,
        config.broadcast.queue_capacity,
    ));
    let hub = Arc::new(BroadcastHub::with_config(
        registry,
        log.clone(),
        HubConfig::from(&config.broadcast),
    ));

    let aggregator =
        StatsAggregator::with_settings(store, AggregationSettings::from(&config.stats));
    let stats = Arc::new(StatsService::new(aggregator, config.stats.max_staleness()));
    let refresher = StatsRefresher::new(stats.clone(), config.stats.refresh_interval());
    let order_events = Arc::new(RecordOrderEventHandler::new(log));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let hub_task = {
        let hub = hub.clone();
        let shutdown = shutdown_rx.clone();
        tokio::spawn(async move { hub.run(shutdown).await })
    };
    let refresher_task = tokio::spawn({
        let shutdown = shutdown_rx.clone();
        async move { refresher.run(shutdown).await }
    });

    let router = build_router(
        AppState {
            hub,
            stats,
            order_events,
            client_retry: config.broadcast.client_retry(),
        },
        &config.server,
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "order-pulse listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await?;

    let (hub_result, refresher_result) = tokio::join!(hub_task, refresher_task);
    if let Err(err) = hub_result {
        tracing::error!(error = %err, "Broadcast hub task failed");
    }
    if let Err(err) = refresher_result {
        tracing::error!(error = %err, "Stats refresher task failed");
    }
    tracing::info!("order-pulse stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match config.server.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

/// Resolves on ctrl-c or SIGTERM after telling background tasks to stop.
/// The hub clears its registry on shutdown, which ends open event streams
/// so the server can drain.
async fn shutdown_signal(shutdown: watch::Sender<bool>) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    let _ = shutdown.send(true);
}
