//! PostgreSQL adapters - Database implementations for read ports.
//!
//! - `PostgresStoreReader` - Aggregate queries over the storefront's orders,
//!   order items, products and reviews

mod store_reader;

pub use store_reader::PostgresStoreReader;
