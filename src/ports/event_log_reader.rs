//! EventLogReader port - Cursor-based reads over the event log.

use std::sync::Arc;
use tokio::sync::watch;

use crate::domain::orders::LoggedEvent;

/// Events read from a cursor position.
#[derive(Debug, Clone, Default)]
pub struct EventBatch {
    pub events: Vec<Arc<LoggedEvent>>,
    /// Number of events between the requested cursor and the first returned
    /// event that are no longer retained.
    pub skipped: u64,
}

impl EventBatch {
    /// Sequence number a reader should request next, if anything was read.
    pub fn next_cursor(&self) -> Option<u64> {
        self.events.last().map(|event| event.sequence + 1)
    }
}

/// Port for reading appended events in global order.
///
/// Sequence numbers start at 1; `latest_sequence` is 0 for an empty log.
pub trait EventLogReader: Send + Sync {
    /// Returns up to `limit` events with sequence >= `from`, in order.
    fn read_from(&self, from: u64, limit: usize) -> EventBatch;

    /// Sequence number of the newest event.
    fn latest_sequence(&self) -> u64;

    /// Receiver notified with the latest sequence on every append.
    fn subscribe_sequence(&self) -> watch::Receiver<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::orders::OrderEvent;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn EventLogReader) {}

    #[test]
    fn next_cursor_follows_last_event() {
        let batch = EventBatch {
            events: vec![Arc::new(LoggedEvent {
                sequence: 41,
                event: OrderEvent::heartbeat(Timestamp::now()),
            })],
            skipped: 0,
        };
        assert_eq!(batch.next_cursor(), Some(42));
        assert_eq!(EventBatch::default().next_cursor(), None);
    }
}
