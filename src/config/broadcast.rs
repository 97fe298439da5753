//! Live event broadcast configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Broadcast hub and subscriber registry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastConfig {
    /// Shared heartbeat cadence in seconds
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,

    /// Reconnect delay hinted to clients in milliseconds
    #[serde(default = "default_client_retry")]
    pub client_retry_ms: u64,

    /// Per-subscriber queue depth
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Longest wait on a full subscriber queue in milliseconds (0 drops on full)
    #[serde(default = "default_write_timeout")]
    pub write_timeout_ms: u64,

    /// Maximum concurrently connected subscribers
    #[serde(default = "default_max_subscribers")]
    pub max_subscribers: usize,

    /// Events kept in the in-memory event log
    #[serde(default = "default_event_log_retention")]
    pub event_log_retention: usize,
}

impl BroadcastConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn client_retry(&self) -> Duration {
        Duration::from_millis(self.client_retry_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    /// Validate broadcast configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.heartbeat_interval_secs == 0 {
            return Err(ValidationError::InvalidHeartbeatInterval);
        }
        if self.client_retry_ms == 0 {
            return Err(ValidationError::InvalidRetryHint);
        }
        if self.queue_capacity == 0 {
            return Err(ValidationError::InvalidQueueCapacity);
        }
        if self.max_subscribers == 0 {
            return Err(ValidationError::InvalidMaxSubscribers);
        }
        if self.event_log_retention == 0 {
            return Err(ValidationError::InvalidRetention);
        }
        Ok(())
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: default_heartbeat_interval(),
            client_retry_ms: default_client_retry(),
            queue_capacity: default_queue_capacity(),
            write_timeout_ms: default_write_timeout(),
            max_subscribers: default_max_subscribers(),
            event_log_retention: default_event_log_retention(),
        }
    }
}

fn default_heartbeat_interval() -> u64 {
    25
}

fn default_client_retry() -> u64 {
    10_000
}

fn default_queue_capacity() -> usize {
    64
}

fn default_write_timeout() -> u64 {
    250
}

fn default_max_subscribers() -> usize {
    1024
}

fn default_event_log_retention() -> usize {
    10_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_defaults() {
        let config = BroadcastConfig::default();
        assert_eq!(config.heartbeat_interval(), Duration::from_secs(25));
        assert_eq!(config.client_retry(), Duration::from_secs(10));
        assert_eq!(config.queue_capacity, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_heartbeat_rejected() {
        let config = BroadcastConfig {
            heartbeat_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidHeartbeatInterval));
    }

    #[test]
    fn test_zero_queue_capacity_rejected() {
        let config = BroadcastConfig {
            queue_capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidQueueCapacity));
    }

    #[test]
    fn test_zero_write_timeout_allowed() {
        let config = BroadcastConfig {
            write_timeout_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert!(config.write_timeout().is_zero());
    }
}
