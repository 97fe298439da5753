//! order-pulse - Live order events and dashboard statistics for the
//! storefront admin.
//!
//! Order mutations are appended to an event log and fanned out to connected
//! dashboards over Server-Sent Events. Aggregate statistics are computed from
//! the order store and served as atomically swapped snapshots.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
