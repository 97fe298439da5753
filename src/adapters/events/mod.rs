//! Event log adapters.
//!
//! - `InMemoryEventLog` - Bounded, append-only log implementing both the
//!   publishing and the cursor-read ports

mod in_memory_log;

pub use in_memory_log::{InMemoryEventLog, DEFAULT_RETENTION};
