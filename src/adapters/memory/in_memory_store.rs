//! In-memory durable store.
//!
//! Holds raw order and product rows and answers `StoreReader` queries by
//! folding them with `StatsCalculator`. Faults can be switched on to
//! exercise the engine's degraded and last-known-good paths.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::domain::foundation::{OrderId, ProductId, Timestamp};
use crate::domain::orders::{OrderRecord, ProductRecord};
use crate::domain::stats::{
    CategoryCount, DailySales, ProductSales, SalesSummary, StatsCalculator, StatusCount,
};
use crate::ports::{StoreError, StoreReader};

/// In-memory order and product store.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(InMemoryStore::new());
/// store.upsert_product(product);
/// store.insert_order(order);
/// let summary = store.sales_summary().await?;
/// ```
#[derive(Default)]
pub struct InMemoryStore {
    orders: RwLock<Vec<OrderRecord>>,
    products: RwLock<HashMap<ProductId, ProductRecord>>,
    review_count: AtomicU64,
    unavailable: AtomicBool,
    reviews_unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_order(&self, order: OrderRecord) {
        self.orders.write().push(order);
    }

    /// Updates an order's status. Returns the previous status if the order exists.
    pub fn set_order_status(&self, id: &OrderId, status: impl Into<String>) -> Option<String> {
        let mut orders = self.orders.write();
        let order = orders.iter_mut().find(|order| &order.id == id)?;
        Some(std::mem::replace(&mut order.status, status.into()))
    }

    pub fn upsert_product(&self, product: ProductRecord) {
        self.products.write().insert(product.id.clone(), product);
    }

    pub fn remove_product(&self, id: &ProductId) -> Option<ProductRecord> {
        self.products.write().remove(id)
    }

    pub fn set_review_count(&self, count: u64) {
        self.review_count.store(count, Ordering::SeqCst);
    }

    // === Fault Injection ===

    /// Makes every query fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Makes only the review count fail.
    pub fn set_reviews_unavailable(&self, unavailable: bool) {
        self.reviews_unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store offline".to_string()));
        }
        Ok(())
    }

    fn product_snapshot(&self) -> Vec<ProductRecord> {
        self.products.read().values().cloned().collect()
    }
}

#[async_trait]
impl StoreReader for InMemoryStore {
    async fn count_products(&self) -> Result<u64, StoreError> {
        self.check_available()?;
        Ok(self.products.read().len() as u64)
    }

    async fn count_orders(&self) -> Result<u64, StoreError> {
        self.check_available()?;
        Ok(self.orders.read().len() as u64)
    }

    async fn count_reviews(&self) -> Result<u64, StoreError> {
        self.check_available()?;
        if self.reviews_unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reviews offline".to_string()));
        }
        Ok(self.review_count.load(Ordering::SeqCst))
    }

    async fn sales_summary(&self) -> Result<SalesSummary, StoreError> {
        self.check_available()?;
        Ok(StatsCalculator::summarize_sales(&self.orders.read()))
    }

    async fn order_status_counts(&self) -> Result<Vec<StatusCount>, StoreError> {
        self.check_available()?;
        Ok(StatsCalculator::count_by_status(&self.orders.read()))
    }

    async fn product_sales(&self, limit: usize) -> Result<Vec<ProductSales>, StoreError> {
        self.check_available()?;
        let sales = StatsCalculator::product_sales(&self.orders.read());
        Ok(StatsCalculator::rank_top(sales, limit))
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<ProductRecord>, StoreError> {
        self.check_available()?;
        let wanted: HashSet<&ProductId> = ids.iter().collect();
        let products = self.products.read();
        Ok(products
            .values()
            .filter(|product| wanted.contains(&product.id))
            .cloned()
            .collect())
    }

    async fn category_counts(&self) -> Result<Vec<CategoryCount>, StoreError> {
        self.check_available()?;
        Ok(StatsCalculator::count_by_category(&self.product_snapshot()))
    }

    async fn daily_sales(&self, since: Timestamp) -> Result<Vec<DailySales>, StoreError> {
        self.check_available()?;
        Ok(StatsCalculator::daily_sales(&self.orders.read(), since))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::orders::LineItem;

    fn order(id: &str, status: &str, total: f64, items: &[(&str, u32)]) -> OrderRecord {
        OrderRecord {
            id: OrderId::new(id).unwrap(),
            status: status.to_string(),
            total,
            created_at: Timestamp::now(),
            items: items
                .iter()
                .map(|(product, quantity)| LineItem {
                    product_id: ProductId::new(*product).unwrap(),
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    fn product(id: &str, category: &str) -> ProductRecord {
        ProductRecord {
            id: ProductId::new(id).unwrap(),
            name: format!("Product {}", id),
            category: category.to_string(),
            price: 10.0,
        }
    }

    #[tokio::test]
    async fn counts_reflect_inserted_rows() {
        let store = InMemoryStore::new();
        store.upsert_product(product("p1", "kitchen"));
        store.insert_order(order("o1", "pending", 20.0, &[("p1", 2)]));
        store.set_review_count(4);

        assert_eq!(store.count_products().await.unwrap(), 1);
        assert_eq!(store.count_orders().await.unwrap(), 1);
        assert_eq!(store.count_reviews().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn set_order_status_returns_previous() {
        let store = InMemoryStore::new();
        store.insert_order(order("o1", "pending", 20.0, &[]));

        let previous = store.set_order_status(&OrderId::new("o1").unwrap(), "shipped");

        assert_eq!(previous.as_deref(), Some("pending"));
        let counts = store.order_status_counts().await.unwrap();
        assert_eq!(counts[0].status, "shipped");
    }

    #[tokio::test]
    async fn products_by_ids_omits_unknown() {
        let store = InMemoryStore::new();
        store.upsert_product(product("p1", "kitchen"));

        let found = store
            .products_by_ids(&[ProductId::new("p1").unwrap(), ProductId::new("nope").unwrap()])
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "p1");
    }

    #[tokio::test]
    async fn unavailable_fails_every_query() {
        let store = InMemoryStore::new();
        store.set_unavailable(true);

        assert!(matches!(store.count_orders().await, Err(StoreError::Unavailable(_))));
        assert!(store.sales_summary().await.is_err());
        assert!(store.daily_sales(Timestamp::now()).await.is_err());

        store.set_unavailable(false);
        assert!(store.count_orders().await.is_ok());
    }

    #[tokio::test]
    async fn reviews_fault_is_isolated() {
        let store = InMemoryStore::new();
        store.set_reviews_unavailable(true);

        assert!(store.count_reviews().await.is_err());
        assert!(store.count_products().await.is_ok());
    }
}
