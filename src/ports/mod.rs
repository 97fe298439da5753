//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Append order events from the mutation path
//! - `EventLogReader` - Cursor reads and wake-ups for the broadcast hub
//!
//! ## Store Ports
//!
//! - `StoreReader` - Read-only queries feeding the aggregation engine

mod event_log_reader;
mod event_publisher;
mod store_reader;

pub use event_log_reader::{EventBatch, EventLogReader};
pub use event_publisher::EventPublisher;
pub use store_reader::{StoreError, StoreReader};
