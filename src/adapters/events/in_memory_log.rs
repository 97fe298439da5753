//! In-memory event log.
//!
//! Append-only, bounded by a retention limit. The broadcast hub reads from
//! it by sequence cursor and is woken through a `watch` channel carrying the
//! latest sequence number.
//!
//! Locks are `parking_lot` and never poison, so this adapter is also the
//! production event log.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::watch;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::orders::{LoggedEvent, OrderEvent};
use crate::ports::{EventBatch, EventLogReader, EventPublisher};

/// Default number of events kept in memory.
pub const DEFAULT_RETENTION: usize = 10_000;

struct LogState {
    entries: VecDeque<Arc<LoggedEvent>>,
    next_sequence: u64,
}

/// Append-only in-memory event log.
///
/// # Example
///
/// ```ignore
/// let log = Arc::new(InMemoryEventLog::new(1_000));
/// let sequence = log.publish(event).await?;
/// assert_eq!(log.latest_sequence(), sequence);
/// ```
pub struct InMemoryEventLog {
    state: RwLock<LogState>,
    retention: usize,
    latest: watch::Sender<u64>,
}

impl InMemoryEventLog {
    /// Creates an empty log keeping at most `retention` events.
    pub fn new(retention: usize) -> Self {
        let (latest, _) = watch::channel(0);
        Self {
            state: RwLock::new(LogState {
                entries: VecDeque::with_capacity(retention.min(1024)),
                next_sequence: 1,
            }),
            retention: retention.max(1),
            latest,
        }
    }

    /// Appends an event and returns its sequence number.
    pub fn append(&self, event: OrderEvent) -> Result<u64, DomainError> {
        if !event.event_type.is_order_mutation() {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!(
                    "Event type '{}' cannot be appended to the event log",
                    event.event_type.as_str()
                ),
            ));
        }

        let mut state = self.state.write();
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state
            .entries
            .push_back(Arc::new(LoggedEvent { sequence, event }));
        while state.entries.len() > self.retention {
            state.entries.pop_front();
        }
        // Notify under the lock so watchers never see a sequence that is
        // not yet readable.
        self.latest.send_replace(sequence);

        tracing::trace!(sequence, "Event appended");
        Ok(sequence)
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryEventLog {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION)
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventLog {
    async fn publish(&self, event: OrderEvent) -> Result<u64, DomainError> {
        self.append(event)
    }
}

impl EventLogReader for InMemoryEventLog {
    fn read_from(&self, from: u64, limit: usize) -> EventBatch {
        let state = self.state.read();
        let Some(oldest) = state.entries.front().map(|entry| entry.sequence) else {
            return EventBatch::default();
        };

        let start = from.max(oldest);
        let skipped = start.saturating_sub(from);
        // Sequences are contiguous within the retained window.
        let offset = (start - oldest) as usize;
        let events = state
            .entries
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        EventBatch { events, skipped }
    }

    fn latest_sequence(&self) -> u64 {
        *self.latest.borrow()
    }

    fn subscribe_sequence(&self) -> watch::Receiver<u64> {
        self.latest.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{OrderId, Timestamp};
    use crate::domain::orders::StatusChangedData;

    fn status_changed(order: &str) -> OrderEvent {
        OrderEvent::order_status_changed(
            OrderId::new(order).unwrap(),
            &StatusChangedData {
                previous_status: None,
                status: "shipped".to_string(),
            },
            Timestamp::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn publish_assigns_increasing_sequences() {
        let log = InMemoryEventLog::new(10);

        let first = log.publish(status_changed("a")).await.unwrap();
        let second = log.publish(status_changed("b")).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(log.latest_sequence(), 2);
    }

    #[tokio::test]
    async fn publish_rejects_hub_events() {
        let log = InMemoryEventLog::new(10);
        let result = log.publish(OrderEvent::heartbeat(Timestamp::now())).await;

        assert!(result.is_err());
        assert!(log.is_empty());
        assert_eq!(log.latest_sequence(), 0);
    }

    #[test]
    fn read_from_returns_events_in_order() {
        let log = InMemoryEventLog::new(10);
        for order in ["a", "b", "c"] {
            log.append(status_changed(order)).unwrap();
        }

        let batch = log.read_from(2, 10);

        let sequences: Vec<u64> = batch.events.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![2, 3]);
        assert_eq!(batch.skipped, 0);
    }

    #[test]
    fn read_from_respects_limit() {
        let log = InMemoryEventLog::new(10);
        for order in ["a", "b", "c"] {
            log.append(status_changed(order)).unwrap();
        }
        assert_eq!(log.read_from(1, 2).events.len(), 2);
    }

    #[test]
    fn retention_drops_oldest_and_reports_skip() {
        let log = InMemoryEventLog::new(2);
        for order in ["a", "b", "c", "d"] {
            log.append(status_changed(order)).unwrap();
        }

        let batch = log.read_from(1, 10);

        assert_eq!(log.len(), 2);
        assert_eq!(batch.skipped, 2);
        assert_eq!(batch.events[0].sequence, 3);
    }

    #[test]
    fn read_past_end_is_empty() {
        let log = InMemoryEventLog::new(10);
        log.append(status_changed("a")).unwrap();
        assert!(log.read_from(5, 10).events.is_empty());
    }

    #[tokio::test]
    async fn watchers_are_notified_on_append() {
        let log = InMemoryEventLog::new(10);
        let mut rx = log.subscribe_sequence();

        log.append(status_changed("a")).unwrap();

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 1);
    }
}
