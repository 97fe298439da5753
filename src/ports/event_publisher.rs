//! EventPublisher port - Interface for appending order events to the event log.
//!
//! The mutation path publishes through this port without knowing how events
//! reach dashboard subscribers.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::orders::OrderEvent;

/// Port for appending order events.
///
/// Implementations must ensure:
/// - Events are assigned a strictly increasing global sequence number
/// - Only order mutation events are accepted
/// - Publishing never waits on subscribers
///
/// # Example
///
/// ```ignore
/// let event = OrderEvent::order_status_changed(order_id, &data, Timestamp::now())?;
/// let sequence = publisher.publish(event).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Append a single event, returning its sequence number.
    async fn publish(&self, event: OrderEvent) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn EventPublisher) {}

    #[allow(dead_code)]
    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn event_publisher_is_send_sync() {
        fn check<T: EventPublisher>() {
            assert_send_sync::<T>();
        }
    }
}
