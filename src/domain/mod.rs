//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `orders` - Order lifecycle events and order/product read models
//! - `stats` - Dashboard statistics snapshot and pure aggregation folds

pub mod foundation;
pub mod orders;
pub mod stats;
