//! In-memory adapters.
//!
//! - `InMemoryStore` - Order and product store for development and tests,
//!   with fault injection for the store-unavailable paths

mod in_memory_store;

pub use in_memory_store::InMemoryStore;
