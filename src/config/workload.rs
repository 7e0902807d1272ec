//! Workload generator configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::workload::{
    GeneratorSettings, DEFAULT_CONCURRENCY, DEFAULT_WAIT_MS, MAX_CONCURRENCY,
};

/// Workload generator configuration
///
/// Values are kept raw; anything non-positive falls back to the defaults
/// when converted with [`WorkloadConfig::settings`].
#[derive(Debug, Clone, Deserialize)]
pub struct WorkloadConfig {
    /// Number of concurrent workers
    #[serde(default = "default_concurrency")]
    pub concurrency: i64,

    /// Pause between two records of one worker, in milliseconds
    #[serde(default = "default_wait_ms")]
    pub wait_ms: i64,

    /// Start generating as soon as the server is up
    #[serde(default = "default_autostart")]
    pub autostart: bool,
}

impl WorkloadConfig {
    pub fn settings(&self) -> GeneratorSettings {
        GeneratorSettings::from_raw(self.concurrency, self.wait_ms)
    }

    /// Validate workload configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.concurrency > MAX_CONCURRENCY as i64 {
            return Err(ValidationError::ConcurrencyTooLarge(MAX_CONCURRENCY));
        }
        Ok(())
    }
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            wait_ms: default_wait_ms(),
            autostart: default_autostart(),
        }
    }
}

fn default_concurrency() -> i64 {
    DEFAULT_CONCURRENCY as i64
}

fn default_wait_ms() -> i64 {
    DEFAULT_WAIT_MS as i64
}

fn default_autostart() -> bool {
    true
}
