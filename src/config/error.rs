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
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Local health mode needs a database URL")]
    LocalModeRequiresDatabase,

    #[error("Nodes info URL must be http(s)")]
    InvalidNodesInfoUrl,

    #[error("Health poll interval must be between 10ms and 60s")]
    InvalidPollInterval,

    #[error("Workload concurrency exceeds maximum allowed ({0})")]
    ConcurrencyTooLarge(usize),

    #[error("Hub buffers must hold at least one frame")]
    InvalidHubCapacity,
}
