//! Stats module - Dashboard statistics snapshot and the pure folds that
//! produce its sections.
//!
//! # Design Philosophy
//!
//! Everything here is side-effect free. Store adapters that hold raw rows
//! (the in-memory store) use `StatsCalculator` directly; SQL adapters push
//! the same folds into queries and the engine re-applies the ordering rules
//! on the results.

mod aggregation;
mod snapshot;

pub use aggregation::{
    ProductSales, SalesSummary, StatsCalculator, MAX_TOP_PRODUCTS, MAX_TRAILING_DAYS,
};
pub use snapshot::{
    CategoryCount, DailySales, Overview, StatsSection, StatsSnapshot, StatusCount, TopProduct,
};
