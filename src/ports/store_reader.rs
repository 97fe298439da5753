//! StoreReader port - Read-only queries over durable order and product data.

use async_trait::async_trait;

use crate::domain::foundation::{ProductId, Timestamp};
use crate::domain::orders::ProductRecord;
use crate::domain::stats::{CategoryCount, DailySales, ProductSales, SalesSummary, StatusCount};

/// Read-only port used by the aggregation engine.
///
/// Each method is an independent query; no isolation is promised across
/// calls, so a snapshot may combine results from slightly different instants.
#[async_trait]
pub trait StoreReader: Send + Sync {
    async fn count_products(&self) -> Result<u64, StoreError>;

    async fn count_orders(&self) -> Result<u64, StoreError>;

    async fn count_reviews(&self) -> Result<u64, StoreError>;

    /// Order count and the sum of all order totals.
    async fn sales_summary(&self) -> Result<SalesSummary, StoreError>;

    /// Order count per distinct status value.
    async fn order_status_counts(&self) -> Result<Vec<StatusCount>, StoreError>;

    /// Summed line-item quantity per product, best sellers first.
    ///
    /// Adapters may truncate to `limit` after ordering by quantity descending
    /// then product id ascending.
    async fn product_sales(&self, limit: usize) -> Result<Vec<ProductSales>, StoreError>;

    /// Catalog metadata for the given ids. Unknown ids are omitted.
    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<ProductRecord>, StoreError>;

    /// Product count per distinct category.
    async fn category_counts(&self) -> Result<Vec<CategoryCount>, StoreError>;

    /// Per-UTC-day order count and sales for orders created at or after `since`.
    async fn daily_sales(&self, since: Timestamp) -> Result<Vec<DailySales>, StoreError>;
}

/// Errors that can occur while reading the durable store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    Query(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreError::Unavailable(err.to_string()),
            other => StoreError::Query(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn StoreReader) {}

    #[test]
    fn pool_timeout_maps_to_unavailable() {
        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn row_not_found_maps_to_query() {
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::Query(_)));
    }

    #[test]
    fn error_messages() {
        let err = StoreError::Unavailable("connection refused".to_string());
        assert_eq!(format!("{}", err), "Store unavailable: connection refused");
    }
}
