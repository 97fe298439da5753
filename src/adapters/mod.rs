//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - In-memory order-event log
//! - `broadcast` - Subscriber registry and fan-out hub
//! - `memory` - In-memory order and product store
//! - `postgres` - PostgreSQL store reader for statistics
//! - `http` - axum routes

pub mod broadcast;
pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;
