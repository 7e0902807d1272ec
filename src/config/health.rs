//! Health monitor configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Where node statuses come from
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HealthMode {
    /// Query the gossip table over the database connection
    #[default]
    Local,
    /// Call a remote node status API
    Remote,
}

/// Health monitor configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
    #[serde(default)]
    pub mode: HealthMode,

    /// Node status endpoint (remote mode)
    pub nodes_info_url: Option<String>,

    /// Bearer token for the node status endpoint (remote mode)
    pub bearer_token: Option<Secret<String>>,

    /// Delay between two polls in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Remote request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl HealthConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate health configuration; `has_database` tells whether local
    /// mode has a connection to query.
    pub fn validate(&self, has_database: bool) -> Result<(), ValidationError> {
        if !(10..=60_000).contains(&self.poll_interval_ms) {
            return Err(ValidationError::InvalidPollInterval);
        }
        match self.mode {
            HealthMode::Local if !has_database => Err(ValidationError::LocalModeRequiresDatabase),
            HealthMode::Local => Ok(()),
            HealthMode::Remote => {
                let url = self
                    .nodes_info_url
                    .as_deref()
                    .filter(|url| !url.trim().is_empty())
                    .ok_or(ValidationError::MissingRequired("HEALTH__NODES_INFO_URL"))?;
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ValidationError::InvalidNodesInfoUrl);
                }
                if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
                    return Err(ValidationError::InvalidTimeout);
                }
                Ok(())
            }
        }
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            mode: HealthMode::default(),
            nodes_info_url: None,
            bearer_token: None,
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_request_timeout() -> u64 {
    5
}
