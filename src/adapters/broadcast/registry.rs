//! Subscriber registry - The set of connected dashboard clients.
//!
//! Each subscriber owns a bounded queue. The registry keeps the sending half;
//! the connection's drain task holds the receiving half inside a
//! [`Subscription`]. Dropping the subscription unregisters the subscriber.
//!
//! All access goes through one `parking_lot::RwLock`, which is synchronous so
//! that `Drop` can unregister without an executor.

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, Stream};
use parking_lot::RwLock;
use tokio::sync::mpsc;

use crate::domain::foundation::{SubscriberId, Timestamp};

use super::OutboundFrame;

/// Default per-subscriber queue depth.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Default ceiling on concurrently registered subscribers.
pub const DEFAULT_MAX_SUBSCRIBERS: usize = 1024;

/// Errors returned when registering a subscriber.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Subscriber limit of {limit} reached")]
    CapacityExceeded { limit: usize },

    #[error("Subscriber {0} is already registered")]
    DuplicateSubscriber(SubscriberId),
}

struct SubscriberEntry {
    sender: mpsc::Sender<OutboundFrame>,
    connected_at: Timestamp,
    last_heartbeat_at: Timestamp,
}

/// A registered subscriber's output channel, as seen by one broadcast.
#[derive(Debug, Clone)]
pub struct Recipient {
    pub id: SubscriberId,
    pub sender: mpsc::Sender<OutboundFrame>,
}

/// Synchronized set of connected subscribers.
pub struct SubscriberRegistry {
    entries: RwLock<HashMap<SubscriberId, SubscriberEntry>>,
    max_subscribers: usize,
    queue_capacity: usize,
}

impl SubscriberRegistry {
    pub fn new(max_subscribers: usize, queue_capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_subscribers,
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Registers a subscriber under a fresh handle.
    pub fn register(self: &Arc<Self>) -> Result<Subscription, RegistryError> {
        self.register_with(SubscriberId::new(), Vec::new())
    }

    /// Registers `id`, queueing `initial` frames before the subscriber
    /// becomes visible to broadcasts.
    ///
    /// # Errors
    ///
    /// - `CapacityExceeded` when `max_subscribers` are already registered
    /// - `DuplicateSubscriber` when `id` is already present
    pub fn register_with(
        self: &Arc<Self>,
        id: SubscriberId,
        initial: Vec<OutboundFrame>,
    ) -> Result<Subscription, RegistryError> {
        let mut entries = self.entries.write();
        if entries.len() >= self.max_subscribers {
            return Err(RegistryError::CapacityExceeded {
                limit: self.max_subscribers,
            });
        }
        if entries.contains_key(&id) {
            return Err(RegistryError::DuplicateSubscriber(id));
        }

        let (sender, receiver) = mpsc::channel(self.queue_capacity.max(initial.len()));
        for frame in initial {
            // Capacity covers every initial frame and the receiver is alive.
            if sender.try_send(frame).is_err() {
                break;
            }
        }

        let connected_at = Timestamp::now();
        entries.insert(
            id,
            SubscriberEntry {
                sender,
                connected_at,
                last_heartbeat_at: connected_at,
            },
        );
        let total = entries.len();
        drop(entries);

        tracing::debug!(subscriber_id = %id, subscribers = total, "Subscriber registered");

        Ok(Subscription {
            id,
            connected_at,
            receiver,
            _guard: SubscriptionGuard {
                registry: Arc::clone(self),
                id,
            },
        })
    }

    /// Removes a subscriber. Returns false if it was already gone.
    pub fn unregister(&self, id: &SubscriberId) -> bool {
        let removed = self.entries.write().remove(id).is_some();
        if removed {
            tracing::debug!(subscriber_id = %id, "Subscriber unregistered");
        }
        removed
    }

    /// Output channels of all subscribers registered at call time.
    pub fn recipients(&self) -> Vec<Recipient> {
        self.entries
            .read()
            .iter()
            .map(|(id, entry)| Recipient {
                id: *id,
                sender: entry.sender.clone(),
            })
            .collect()
    }

    /// Invokes `f` for each subscriber in a snapshot taken at call time.
    ///
    /// `f` runs outside the lock, so it may register or unregister.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&Recipient),
    {
        for recipient in self.recipients() {
            f(&recipient);
        }
    }

    /// Records a liveness signal. Returns false for unknown subscribers.
    pub fn touch(&self, id: &SubscriberId) -> bool {
        self.touch_at(id, Timestamp::now())
    }

    pub fn touch_at(&self, id: &SubscriberId, at: Timestamp) -> bool {
        match self.entries.write().get_mut(id) {
            Some(entry) => {
                entry.last_heartbeat_at = at;
                true
            }
            None => false,
        }
    }

    pub fn last_heartbeat_at(&self, id: &SubscriberId) -> Option<Timestamp> {
        self.entries.read().get(id).map(|entry| entry.last_heartbeat_at)
    }

    pub fn connected_at(&self, id: &SubscriberId) -> Option<Timestamp> {
        self.entries.read().get(id).map(|entry| entry.connected_at)
    }

    pub fn contains(&self, id: &SubscriberId) -> bool {
        self.entries.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every subscriber, closing their queues. Returns how many
    /// were removed.
    pub fn clear(&self) -> usize {
        let drained: Vec<_> = self.entries.write().drain().collect();
        drained.len()
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SUBSCRIBERS, DEFAULT_QUEUE_CAPACITY)
    }
}

/// Receiving side of a registered subscriber.
///
/// Frames arrive in broadcast order. The stream ends once the hub drops the
/// subscriber or the registry is cleared.
pub struct Subscription {
    id: SubscriberId,
    connected_at: Timestamp,
    receiver: mpsc::Receiver<OutboundFrame>,
    _guard: SubscriptionGuard,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn connected_at(&self) -> Timestamp {
        self.connected_at
    }

    /// Waits for the next frame; `None` once the subscriber was removed.
    pub async fn recv(&mut self) -> Option<OutboundFrame> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<OutboundFrame> {
        self.receiver.try_recv().ok()
    }

    /// Turns the subscription into a stream of frames. Dropping the stream
    /// unregisters the subscriber.
    pub fn into_stream(self) -> impl Stream<Item = OutboundFrame> + Send + 'static {
        stream::unfold(self, |mut subscription| async move {
            let frame = subscription.receiver.recv().await?;
            Some((frame, subscription))
        })
    }
}

/// Unregisters its subscriber when dropped.
struct SubscriptionGuard {
    registry: Arc<SubscriberRegistry>,
    id: SubscriberId,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.registry.unregister(&self.id);
    }
}
