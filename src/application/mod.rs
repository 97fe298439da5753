//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! The write side records order events; the read side serves statistics
//! snapshots.

pub mod handlers;

pub use handlers::{
    // Order event commands
    RecordOrderCreatedCommand, RecordOrderEventHandler, RecordOrderStatusChangedCommand,
    // Stats
    AggregationSettings, StatsAggregator, StatsError, StatsRefresher, StatsService, StatsView,
};
