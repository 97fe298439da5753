//! Live order-event broadcast.
//!
//! - `SubscriberRegistry` - Synchronized set of connected subscribers, each
//!   with a bounded output queue
//! - `BroadcastHub` - Background task fanning log events and heartbeats out
//!   to the registry
//! - `OutboundFrame` - An event serialized once per broadcast

mod frames;
mod hub;
mod registry;

pub use frames::OutboundFrame;
pub use hub::{BroadcastHub, DeliveryFailure, DeliveryReport, HubConfig};
pub use registry::{
    Recipient, RegistryError, SubscriberRegistry, Subscription, DEFAULT_MAX_SUBSCRIBERS,
    DEFAULT_QUEUE_CAPACITY,
};
