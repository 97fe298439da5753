//! BroadcastHub - Fans order events and heartbeats out to subscribers.
//!
//! The hub runs as one long-lived task driven by two sources:
//! 1. Wake-ups from the event log when a new event is appended
//! 2. A single shared heartbeat timer
//!
//! Both feed the same delivery routine, so every subscriber observes events
//! in log order and heartbeats interleave in emission order.
//!
//! ## Delivery
//!
//! Each recipient is written concurrently. A write that finds the queue
//! closed, full past `write_timeout`, or full with a zero timeout removes that
//! subscriber only. Nothing is retried and nothing is buffered for
//! subscribers that are not connected.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `heartbeat_interval` | 25s | Shared keepalive cadence |
//! | `write_timeout` | 250ms | Longest wait on a full subscriber queue |
//! | `batch_size` | 256 | Events read from the log per pass |

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::mpsc::error::{SendTimeoutError, TrySendError};
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::BroadcastConfig;
use crate::domain::foundation::{ErrorCode, SubscriberId, Timestamp};
use crate::domain::orders::{LoggedEvent, OrderEvent};
use crate::ports::EventLogReader;

use super::{OutboundFrame, Recipient, RegistryError, SubscriberRegistry, Subscription};

/// Configuration for the BroadcastHub.
#[derive(Debug, Clone)]
pub struct HubConfig {
    pub heartbeat_interval: Duration,
    pub write_timeout: Duration,
    pub batch_size: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(25),
            write_timeout: Duration::from_millis(250),
            batch_size: 256,
        }
    }
}

impl HubConfig {
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }
}

impl From<&BroadcastConfig> for HubConfig {
    fn from(config: &BroadcastConfig) -> Self {
        Self::default()
            .with_heartbeat_interval(config.heartbeat_interval())
            .with_write_timeout(config.write_timeout())
    }
}

/// Why a write to one subscriber failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryFailure {
    #[error("subscriber queue closed")]
    Closed,

    #[error("subscriber queue full")]
    QueueFull,

    #[error("subscriber write timed out")]
    TimedOut,
}

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub recipients: usize,
    pub delivered: usize,
    pub dropped: usize,
}

/// Delivers order events and heartbeats to every registered subscriber.
pub struct BroadcastHub {
    registry: Arc<SubscriberRegistry>,
    log: Arc<dyn EventLogReader>,
    config: HubConfig,
}

impl BroadcastHub {
    pub fn new(registry: Arc<SubscriberRegistry>, log: Arc<dyn EventLogReader>) -> Self {
        Self::with_config(registry, log, HubConfig::default())
    }

    pub fn with_config(
        registry: Arc<SubscriberRegistry>,
        log: Arc<dyn EventLogReader>,
        config: HubConfig,
    ) -> Self {
        Self {
            registry,
            log,
            config,
        }
    }

    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }

    pub fn latest_sequence(&self) -> u64 {
        self.log.latest_sequence()
    }

    /// Registers a new subscriber whose queue already holds its `Connected`
    /// event.
    pub fn connect(&self) -> Result<Subscription, RegistryError> {
        let id = SubscriberId::new();
        let connected = OrderEvent::connected(&id, Timestamp::now());
        let initial = match OutboundFrame::encode(&connected, None) {
            Ok(frame) => vec![frame],
            Err(err) => {
                tracing::warn!(subscriber_id = %id, error = %err, "Connected event dropped");
                Vec::new()
            }
        };

        let subscription = self.registry.register_with(id, initial)?;
        tracing::info!(
            subscriber_id = %id,
            subscribers = self.registry.len(),
            "Dashboard subscriber connected"
        );
        Ok(subscription)
    }

    /// Run the hub until the shutdown signal is received, then clear the
    /// registry.
    ///
    /// Events appended before the hub starts are not replayed.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut sequences = self.log.subscribe_sequence();
        let mut cursor = sequences.borrow_and_update().saturating_add(1);

        let period = self.config.heartbeat_interval;
        let mut heartbeat = time::interval_at(Instant::now() + period, period);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            heartbeat_secs = period.as_secs(),
            from_sequence = cursor,
            "Broadcast hub started"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }

                changed = sequences.changed() => {
                    if changed.is_err() {
                        tracing::warn!("Event log closed");
                        break;
                    }
                    cursor = self.drain_log(cursor).await;
                }

                _ = heartbeat.tick() => {
                    self.broadcast_heartbeat().await;
                }
            }
        }

        self.shutdown();
    }

    /// Broadcasts every retained event from `cursor` onward and returns the
    /// next cursor.
    pub async fn drain_log(&self, mut cursor: u64) -> u64 {
        loop {
            let batch = self.log.read_from(cursor, self.config.batch_size);
            if batch.skipped > 0 {
                tracing::warn!(
                    skipped = batch.skipped,
                    from_sequence = cursor,
                    "Event log retention overtook the hub; events skipped"
                );
            }
            let Some(next) = batch.next_cursor() else {
                return cursor;
            };
            for event in &batch.events {
                self.broadcast_event(event).await;
            }
            cursor = next;
        }
    }

    /// Fans one logged event out to the current subscribers.
    pub async fn broadcast_event(&self, event: &LoggedEvent) -> DeliveryReport {
        let frame = match OutboundFrame::encode(&event.event, Some(event.sequence)) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::warn!(
                    sequence = event.sequence,
                    code = %ErrorCode::MalformedEvent,
                    error = %err,
                    "Dropping event that failed to serialize"
                );
                return DeliveryReport::default();
            }
        };

        let (report, _) = self.deliver(frame).await;
        tracing::debug!(
            sequence = event.sequence,
            event_type = event.event.event_type.as_str(),
            recipients = report.recipients,
            dropped = report.dropped,
            "Event broadcast"
        );
        report
    }

    /// Sends a heartbeat to the current subscribers.
    pub async fn broadcast_heartbeat(&self) -> DeliveryReport {
        let now = Timestamp::now();
        let frame = match OutboundFrame::encode(&OrderEvent::heartbeat(now), None) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::warn!(error = %err, "Dropping heartbeat that failed to serialize");
                return DeliveryReport::default();
            }
        };

        let (report, delivered) = self.deliver(frame).await;
        for id in &delivered {
            self.registry.touch_at(id, now);
        }
        tracing::trace!(recipients = report.recipients, dropped = report.dropped, "Heartbeat sent");
        report
    }

    /// Stops delivery by closing every subscriber queue.
    pub fn shutdown(&self) -> usize {
        let removed = self.registry.clear();
        tracing::info!(subscribers = removed, "Broadcast hub stopped");
        removed
    }

    async fn deliver(&self, frame: OutboundFrame) -> (DeliveryReport, Vec<SubscriberId>) {
        let recipients = self.registry.recipients();
        let results = join_all(
            recipients
                .iter()
                .map(|recipient| self.deliver_to(recipient, frame.clone())),
        )
        .await;

        let mut report = DeliveryReport {
            recipients: recipients.len(),
            ..DeliveryReport::default()
        };
        let mut delivered = Vec::with_capacity(recipients.len());

        for (recipient, result) in recipients.iter().zip(results) {
            match result {
                Ok(()) => {
                    report.delivered += 1;
                    delivered.push(recipient.id);
                }
                Err(failure) => {
                    report.dropped += 1;
                    self.registry.unregister(&recipient.id);
                    tracing::debug!(
                        subscriber_id = %recipient.id,
                        code = %ErrorCode::DeliveryFailure,
                        reason = %failure,
                        "Subscriber dropped"
                    );
                }
            }
        }

        (report, delivered)
    }

    async fn deliver_to(
        &self,
        recipient: &Recipient,
        frame: OutboundFrame,
    ) -> Result<(), DeliveryFailure> {
        match recipient.sender.try_send(frame) {
            Ok(()) => Ok(()),
            Err(TrySendError::Closed(_)) => Err(DeliveryFailure::Closed),
            Err(TrySendError::Full(frame)) => {
                if self.config.write_timeout.is_zero() {
                    return Err(DeliveryFailure::QueueFull);
                }
                recipient
                    .sender
                    .send_timeout(frame, self.config.write_timeout)
                    .await
                    .map_err(|err| match err {
                        SendTimeoutError::Closed(_) => DeliveryFailure::Closed,
                        SendTimeoutError::Timeout(_) => DeliveryFailure::TimedOut,
                    })
            }
        }
    }
}
