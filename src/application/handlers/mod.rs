//! Application handlers.
//!
//! Command handlers for the order write path and the dashboard statistics
//! services.

pub mod order_events;
pub mod stats;

pub use order_events::{
    RecordOrderCreatedCommand, RecordOrderEventHandler, RecordOrderStatusChangedCommand,
};
pub use stats::{
    AggregationSettings, StatsAggregator, StatsError, StatsRefresher, StatsService, StatsView,
};
