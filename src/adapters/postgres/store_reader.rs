//! PostgreSQL implementation of StoreReader.
//!
//! Aggregates are pushed into SQL. Expected schema (owned by the storefront):
//!
//! - `products (id TEXT, name TEXT, category TEXT, price DOUBLE PRECISION)`
//! - `orders (id TEXT, status TEXT, total DOUBLE PRECISION, created_at TIMESTAMPTZ)`
//! - `order_items (order_id TEXT, product_id TEXT, quantity INTEGER)`
//! - `reviews (id TEXT, ...)`

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::config::DatabaseConfig;
use crate::domain::foundation::{ProductId, Timestamp};
use crate::domain::orders::ProductRecord;
use crate::domain::stats::{CategoryCount, DailySales, ProductSales, SalesSummary, StatusCount};
use crate::ports::{StoreError, StoreReader};

/// PostgreSQL implementation of StoreReader.
#[derive(Clone)]
pub struct PostgresStoreReader {
    pool: PgPool,
}

impl PostgresStoreReader {
    /// Creates a new PostgresStoreReader.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool from configuration.
    ///
    /// The pool connects lazily so the service starts even while the
    /// database is down; queries then fail with `StoreError::Unavailable`.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = config
            .url()
            .ok_or_else(|| StoreError::Unavailable("database url not configured".to_string()))?;

        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .idle_timeout(config.idle_timeout())
            .connect_lazy(url)?;

        Ok(Self::new(pool))
    }

    async fn count(&self, sql: &str) -> Result<u64, StoreError> {
        let row = sqlx::query(sql).fetch_one(&self.pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(non_negative(count))
    }
}

fn non_negative(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn product_id(row: &PgRow, column: &str) -> Result<ProductId, StoreError> {
    let raw: String = row.try_get(column)?;
    ProductId::new(raw).map_err(|e| StoreError::Query(e.to_string()))
}

#[async_trait]
impl StoreReader for PostgresStoreReader {
    async fn count_products(&self) -> Result<u64, StoreError> {
        self.count("SELECT COUNT(*)::BIGINT AS count FROM products").await
    }

    async fn count_orders(&self) -> Result<u64, StoreError> {
        self.count("SELECT COUNT(*)::BIGINT AS count FROM orders").await
    }

    async fn count_reviews(&self) -> Result<u64, StoreError> {
        self.count("SELECT COUNT(*)::BIGINT AS count FROM reviews").await
    }

    async fn sales_summary(&self) -> Result<SalesSummary, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*)::BIGINT AS order_count,
                   COALESCE(SUM(total), 0)::DOUBLE PRECISION AS total_sales
            FROM orders
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(SalesSummary {
            order_count: non_negative(row.try_get("order_count")?),
            total_sales: row.try_get("total_sales")?,
        })
    }

    async fn order_status_counts(&self) -> Result<Vec<StatusCount>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT status, COUNT(*)::BIGINT AS count
            FROM orders
            GROUP BY status
            ORDER BY status
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<_, StoreError> {
                Ok(StatusCount {
                    status: row.try_get("status")?,
                    count: non_negative(row.try_get("count")?),
                })
            })
            .collect()
    }

    async fn product_sales(&self, limit: usize) -> Result<Vec<ProductSales>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT product_id, SUM(quantity)::BIGINT AS quantity
            FROM order_items
            GROUP BY product_id
            ORDER BY quantity DESC, product_id ASC
            LIMIT $1
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<_, StoreError> {
                Ok(ProductSales {
                    product_id: product_id(row, "product_id")?,
                    quantity: non_negative(row.try_get("quantity")?),
                })
            })
            .collect()
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<ProductRecord>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = ids.iter().map(|id| id.as_str().to_string()).collect();

        let rows = sqlx::query(
            r#"
            SELECT id, name, category, price::DOUBLE PRECISION AS price
            FROM products
            WHERE id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<_, StoreError> {
                Ok(ProductRecord {
                    id: product_id(row, "id")?,
                    name: row.try_get("name")?,
                    category: row.try_get("category")?,
                    price: row.try_get("price")?,
                })
            })
            .collect()
    }

    async fn category_counts(&self) -> Result<Vec<CategoryCount>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT category, COUNT(*)::BIGINT AS count
            FROM products
            GROUP BY category
            ORDER BY category
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<_, StoreError> {
                Ok(CategoryCount {
                    category: row.try_get("category")?,
                    count: non_negative(row.try_get("count")?),
                })
            })
            .collect()
    }

    async fn daily_sales(&self, since: Timestamp) -> Result<Vec<DailySales>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT (created_at AT TIME ZONE 'UTC')::DATE AS day,
                   COUNT(*)::BIGINT AS orders_count,
                   COALESCE(SUM(total), 0)::DOUBLE PRECISION AS daily_sales
            FROM orders
            WHERE created_at >= $1
            GROUP BY day
            ORDER BY day DESC
            "#,
        )
        .bind(*since.as_datetime())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<_, StoreError> {
                Ok(DailySales {
                    date: row.try_get("day")?,
                    orders_count: non_negative(row.try_get("orders_count")?),
                    daily_sales: row.try_get("daily_sales")?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_counts_clamp_to_zero() {
        assert_eq!(non_negative(-3), 0);
        assert_eq!(non_negative(42), 42);
    }

    #[test]
    fn connect_without_url_is_unavailable() {
        let result = PostgresStoreReader::connect(&DatabaseConfig::default());
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn lazy_pool_reports_unreachable_database() {
        let config = DatabaseConfig {
            url: Some("postgres://nobody@127.0.0.1:1/none".to_string()),
            min_connections: 0,
            acquire_timeout_secs: 1,
            ..Default::default()
        };
        let reader = PostgresStoreReader::connect(&config).unwrap();

        let result = reader.count_orders().await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
