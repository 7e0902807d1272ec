//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CLUSTER_DEMO` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use cluster_demo::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod database;
mod error;
mod health;
mod hub;
mod server;
mod workload;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use health::{HealthConfig, HealthMode};
pub use hub::HubSettings;
pub use server::ServerConfig;
pub use workload::WorkloadConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults. Without a database URL records are kept in
/// memory, which also requires `health.mode = remote`. Load using
/// [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (bind address, logging, static files)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL wire protocol connection)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Workload generator configuration
    #[serde(default)]
    pub workload: WorkloadConfig,

    /// Health monitor configuration
    #[serde(default)]
    pub health: HealthConfig,

    /// Broadcast hub configuration
    #[serde(default)]
    pub hub: HubSettings,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CLUSTER_DEMO` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CLUSTER_DEMO__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CLUSTER_DEMO__DATABASE__URL=...` -> `database.url = ...`
    /// - `CLUSTER_DEMO__HEALTH__MODE=remote` -> `health.mode = remote`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CLUSTER_DEMO")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.workload.validate()?;
        self.health.validate(self.database.url().is_some())?;
        self.hub.validate()?;
        Ok(())
    }
}
