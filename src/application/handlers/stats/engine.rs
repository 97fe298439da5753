//! StatsAggregator - Computes a StatsSnapshot from the durable store.
//!
//! The independent queries run concurrently. There is no isolation across
//! them, so counts and sums may reflect slightly different instants under
//! concurrent writes.
//!
//! A failing review count is tolerated: the field becomes zero and the
//! section is listed in `degraded`. Any other failure aborts the computation.

use std::sync::Arc;

use crate::config::StatsConfig;
use crate::domain::foundation::{ProductId, Timestamp};
use crate::domain::stats::{
    Overview, StatsCalculator, StatsSection, StatsSnapshot, MAX_TOP_PRODUCTS, MAX_TRAILING_DAYS,
};
use crate::ports::StoreReader;

use super::StatsError;

/// Window and ranking parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationSettings {
    pub trailing_days: u32,
    pub top_products_limit: usize,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            trailing_days: 7,
            top_products_limit: MAX_TOP_PRODUCTS,
        }
    }
}

impl From<&StatsConfig> for AggregationSettings {
    fn from(config: &StatsConfig) -> Self {
        Self {
            trailing_days: config.trailing_days.clamp(1, MAX_TRAILING_DAYS),
            top_products_limit: config.top_products_limit.clamp(1, MAX_TOP_PRODUCTS),
        }
    }
}

/// Read-only, re-entrant snapshot computation.
pub struct StatsAggregator {
    store: Arc<dyn StoreReader>,
    settings: AggregationSettings,
}

impl StatsAggregator {
    pub fn new(store: Arc<dyn StoreReader>) -> Self {
        Self::with_settings(store, AggregationSettings::default())
    }

    pub fn with_settings(store: Arc<dyn StoreReader>, settings: AggregationSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> AggregationSettings {
        self.settings
    }

    /// Computes a snapshot as of `now`.
    pub async fn compute(&self, now: Timestamp) -> Result<StatsSnapshot, StatsError> {
        let store = self.store.as_ref();
        let limit = self.settings.top_products_limit;
        let since = StatsCalculator::window_start(now, self.settings.trailing_days);

        let (products, orders, reviews, sales, statuses, ranked, categories, daily) = tokio::join!(
            store.count_products(),
            store.count_orders(),
            store.count_reviews(),
            store.sales_summary(),
            store.order_status_counts(),
            store.product_sales(limit),
            store.category_counts(),
            store.daily_sales(since),
        );

        let mut degraded = Vec::new();
        let total_reviews = match reviews {
            Ok(count) => count,
            Err(err) => {
                tracing::warn!(error = %err, "Review count unavailable; reporting zero");
                degraded.push(StatsSection::TotalReviews);
                0
            }
        };

        let sales = sales?;
        let ranked = StatsCalculator::rank_top(ranked?, limit);
        let ids: Vec<ProductId> = ranked.iter().map(|s| s.product_id.clone()).collect();
        let catalog = store.products_by_ids(&ids).await?;

        let mut recent_orders = daily?;
        StatsCalculator::sort_daily_desc(&mut recent_orders);

        Ok(StatsSnapshot {
            overview: Overview {
                total_products: products?,
                total_orders: orders?,
                total_sales: sales.total_sales,
                total_reviews,
                average_order_value: sales.average_order_value(),
            },
            orders_by_status: statuses?,
            top_products: StatsCalculator::join_top_products(&ranked, &catalog),
            products_by_category: categories?,
            recent_orders,
            generated_at: now,
            degraded,
        })
    }
}
