//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Heartbeat interval must be at least one second")]
    InvalidHeartbeatInterval,

    #[error("Client retry hint must be positive")]
    InvalidRetryHint,

    #[error("Subscriber queue capacity must be positive")]
    InvalidQueueCapacity,

    #[error("Maximum subscribers must be positive")]
    InvalidMaxSubscribers,

    #[error("Event log retention must be positive")]
    InvalidRetention,

    #[error("Stats refresh interval must be at least one second")]
    InvalidRefreshInterval,

    #[error("Trailing window must cover between 1 and {max} days")]
    InvalidTrailingDays { max: u32 },

    #[error("Top products limit must be between 1 and {max}")]
    InvalidTopProductsLimit { max: usize },
}
