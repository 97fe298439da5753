//! The immutable statistics snapshot served to the admin dashboard.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::foundation::{ProductId, Timestamp};

/// Point-in-time summary of order and product data.
///
/// A snapshot is never mutated after it is built; a recomputation produces a
/// new value which replaces the previous one wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub overview: Overview,
    pub orders_by_status: Vec<StatusCount>,
    pub top_products: Vec<TopProduct>,
    pub products_by_category: Vec<CategoryCount>,
    pub recent_orders: Vec<DailySales>,
    pub generated_at: Timestamp,
    /// Sections whose source query failed and were filled with neutral values.
    pub degraded: Vec<StatsSection>,
}

impl StatsSnapshot {
    /// How long ago this snapshot was computed.
    pub fn age(&self, now: Timestamp) -> Duration {
        now.duration_since(&self.generated_at)
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_products: u64,
    pub total_orders: u64,
    pub total_sales: f64,
    pub total_reviews: u64,
    pub average_order_value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

/// A ranked product joined with its catalog metadata.
///
/// When the product no longer exists the metadata fields are empty and
/// `price` is `None`, but the entry keeps its rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Option<f64>,
    pub sales_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

/// Order count and sales total for one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    pub date: NaiveDate,
    pub orders_count: u64,
    pub daily_sales: f64,
}

/// Snapshot sections that tolerate source failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StatsSection {
    TotalReviews,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn empty_snapshot(generated_at: Timestamp) -> StatsSnapshot {
        StatsSnapshot {
            overview: Overview {
                total_products: 0,
                total_orders: 0,
                total_sales: 0.0,
                total_reviews: 0,
                average_order_value: 0.0,
            },
            orders_by_status: vec![],
            top_products: vec![],
            products_by_category: vec![],
            recent_orders: vec![],
            generated_at,
            degraded: vec![],
        }
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let at = Timestamp::from_datetime(Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap());
        let mut snapshot = empty_snapshot(at);
        snapshot.recent_orders.push(DailySales {
            date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            orders_count: 2,
            daily_sales: 40.5,
        });

        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["overview"]["averageOrderValue"], 0.0);
        assert_eq!(json["recentOrders"][0]["date"], "2026-03-10");
        assert_eq!(json["recentOrders"][0]["ordersCount"], 2);
        assert_eq!(json["generatedAt"], "2026-03-10T12:00:00Z");
        assert!(json["degraded"].as_array().unwrap().is_empty());
    }

    #[test]
    fn missing_product_price_serializes_as_null() {
        let product = TopProduct {
            product_id: ProductId::new("gone").unwrap(),
            name: String::new(),
            category: String::new(),
            price: None,
            sales_count: 3,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert!(json["price"].is_null());
        assert_eq!(json["salesCount"], 3);
    }

    #[test]
    fn age_is_measured_from_generation() {
        let at = Timestamp::from_datetime(Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap());
        let later = Timestamp::from_datetime(Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 45).unwrap());
        assert_eq!(empty_snapshot(at).age(later).num_seconds(), 45);
    }

    #[test]
    fn degraded_section_names_are_camel_case() {
        let json = serde_json::to_string(&StatsSection::TotalReviews).unwrap();
        assert_eq!(json, "\"totalReviews\"");
    }
}
