//! Stats Calculator - Pure folds over orders and products.

use std::collections::{BTreeMap, HashMap};

use crate::domain::foundation::{ProductId, Timestamp};
use crate::domain::orders::{OrderRecord, ProductRecord};

use super::{CategoryCount, DailySales, StatusCount, TopProduct};

/// Hard ceiling on the top-products ranking.
pub const MAX_TOP_PRODUCTS: usize = 5;

/// Longest trailing window the recent orders section may cover.
pub const MAX_TRAILING_DAYS: u32 = 366;

/// Order count and summed totals across all orders.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SalesSummary {
    pub order_count: u64,
    pub total_sales: f64,
}

impl SalesSummary {
    /// Arithmetic mean of order totals, or 0 when there are no orders.
    pub fn average_order_value(&self) -> f64 {
        if self.order_count == 0 {
            0.0
        } else {
            self.total_sales / self.order_count as f64
        }
    }
}

/// Summed line-item quantity for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSales {
    pub product_id: ProductId,
    pub quantity: u64,
}

/// Statistics fold functions.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Counts orders and sums their totals.
    pub fn summarize_sales(orders: &[OrderRecord]) -> SalesSummary {
        orders.iter().fold(SalesSummary::default(), |acc, order| SalesSummary {
            order_count: acc.order_count + 1,
            total_sales: acc.total_sales + order.total,
        })
    }

    /// Counts orders per distinct status string, ordered by status.
    pub fn count_by_status(orders: &[OrderRecord]) -> Vec<StatusCount> {
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for order in orders {
            *counts.entry(order.status.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(status, count)| StatusCount {
                status: status.to_string(),
                count,
            })
            .collect()
    }

    /// Expands line items and sums quantity per product, ordered by product id.
    pub fn product_sales(orders: &[OrderRecord]) -> Vec<ProductSales> {
        let mut totals: BTreeMap<&ProductId, u64> = BTreeMap::new();
        for item in orders.iter().flat_map(|order| order.items.iter()) {
            *totals.entry(&item.product_id).or_default() += u64::from(item.quantity);
        }
        totals
            .into_iter()
            .map(|(product_id, quantity)| ProductSales {
                product_id: product_id.clone(),
                quantity,
            })
            .collect()
    }

    /// Sorts by quantity descending, ties by product id ascending, and keeps
    /// at most `limit` entries (never more than [`MAX_TOP_PRODUCTS`]).
    pub fn rank_top(mut sales: Vec<ProductSales>, limit: usize) -> Vec<ProductSales> {
        sales.sort_by(|a, b| {
            b.quantity
                .cmp(&a.quantity)
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
        sales.truncate(limit.min(MAX_TOP_PRODUCTS));
        sales
    }

    /// Attaches catalog metadata to ranked products, keeping rank order.
    pub fn join_top_products(
        ranked: &[ProductSales],
        products: &[ProductRecord],
    ) -> Vec<TopProduct> {
        let by_id: HashMap<&ProductId, &ProductRecord> =
            products.iter().map(|product| (&product.id, product)).collect();

        ranked
            .iter()
            .map(|sales| match by_id.get(&sales.product_id) {
                Some(product) => TopProduct {
                    product_id: sales.product_id.clone(),
                    name: product.name.clone(),
                    category: product.category.clone(),
                    price: Some(product.price),
                    sales_count: sales.quantity,
                },
                None => TopProduct {
                    product_id: sales.product_id.clone(),
                    name: String::new(),
                    category: String::new(),
                    price: None,
                    sales_count: sales.quantity,
                },
            })
            .collect()
    }

    /// Counts products per distinct category, ordered by category.
    pub fn count_by_category(products: &[ProductRecord]) -> Vec<CategoryCount> {
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for product in products {
            *counts.entry(product.category.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count,
            })
            .collect()
    }

    /// Start of the trailing window ending at `now`.
    ///
    /// The boundary is inclusive: an order created exactly `days` ago is in.
    pub fn window_start(now: Timestamp, days: u32) -> Timestamp {
        now.minus_days(i64::from(days))
    }

    /// Buckets orders created at or after `since` by UTC date, newest first.
    pub fn daily_sales(orders: &[OrderRecord], since: Timestamp) -> Vec<DailySales> {
        let mut days: BTreeMap<chrono::NaiveDate, (u64, f64)> = BTreeMap::new();
        for order in orders.iter().filter(|order| order.created_at >= since) {
            let entry = days.entry(order.created_at.utc_date()).or_default();
            entry.0 += 1;
            entry.1 += order.total;
        }
        days.into_iter()
            .rev()
            .map(|(date, (orders_count, daily_sales))| DailySales {
                date,
                orders_count,
                daily_sales,
            })
            .collect()
    }

    /// Re-applies the descending date order to rows from any source.
    pub fn sort_daily_desc(rows: &mut [DailySales]) {
        rows.sort_by(|a, b| b.date.cmp(&a.date));
    }
}
