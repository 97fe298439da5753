//! Dashboard statistics configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::stats::{MAX_TOP_PRODUCTS, MAX_TRAILING_DAYS};

/// Aggregation engine and snapshot cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    /// Background recomputation cadence in seconds
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Age in seconds after which a request recomputes (0 = every request)
    #[serde(default = "default_max_staleness")]
    pub max_staleness_secs: u64,

    /// Days covered by the recent orders section
    #[serde(default = "default_trailing_days")]
    pub trailing_days: u32,

    /// Entries in the top products ranking
    #[serde(default = "default_top_products_limit")]
    pub top_products_limit: usize,
}

impl StatsConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn max_staleness(&self) -> Duration {
        Duration::from_secs(self.max_staleness_secs)
    }

    /// Validate stats configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.refresh_interval_secs == 0 {
            return Err(ValidationError::InvalidRefreshInterval);
        }
        if self.trailing_days == 0 || self.trailing_days > MAX_TRAILING_DAYS {
            return Err(ValidationError::InvalidTrailingDays {
                max: MAX_TRAILING_DAYS,
            });
        }
        if self.top_products_limit == 0 || self.top_products_limit > MAX_TOP_PRODUCTS {
            return Err(ValidationError::InvalidTopProductsLimit {
                max: MAX_TOP_PRODUCTS,
            });
        }
        Ok(())
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
            max_staleness_secs: default_max_staleness(),
            trailing_days: default_trailing_days(),
            top_products_limit: default_top_products_limit(),
        }
    }
}

fn default_refresh_interval() -> u64 {
    60
}

fn default_max_staleness() -> u64 {
    30
}

fn default_trailing_days() -> u32 {
    7
}

fn default_top_products_limit() -> usize {
    MAX_TOP_PRODUCTS
}
