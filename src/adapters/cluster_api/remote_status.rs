//! Remote NodeStatusSource - Polls a managed cluster's node status API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = RemoteStatusConfig::new("https://cluster.example/api/v1/nodes")
//!     .with_bearer_token(token)
//!     .with_timeout(Duration::from_secs(5));
//!
//! let source = RemoteNodeStatusSource::new(config)?;
//! ```
//!
//! The endpoint answers with:
//!
//! ```json
//! { "nodes": [ { "name": "n1", "region_name": "us-east1", "status": "LIVE" } ],
//!   "pagination": null }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::domain::health::NodeStatus;
use crate::ports::{NodeSourceError, NodeStatusSource};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the remote status source.
#[derive(Debug, Clone)]
pub struct RemoteStatusConfig {
    pub nodes_info_url: String,
    /// Either a bare token or a full `Bearer ...` header value.
    bearer_token: Option<Secret<String>>,
    pub timeout: Duration,
}

impl RemoteStatusConfig {
    pub fn new(nodes_info_url: impl Into<String>) -> Self {
        Self {
            nodes_info_url: nodes_info_url.into(),
            bearer_token: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(Secret::new(token.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Authorization header value, if a token is configured.
    fn authorization(&self) -> Option<String> {
        let token = self.bearer_token.as_ref()?.expose_secret().trim();
        if token.is_empty() {
            None
        } else if token.starts_with("Bearer ") {
            Some(token.to_string())
        } else {
            Some(format!("Bearer {}", token))
        }
    }
}

/// Response body; `pagination` is ignored.
#[derive(Debug, Deserialize)]
struct NodesResponse {
    nodes: Vec<NodeStatus>,
}

pub struct RemoteNodeStatusSource {
    config: RemoteStatusConfig,
    client: Client,
}

impl RemoteNodeStatusSource {
    pub fn new(config: RemoteStatusConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl NodeStatusSource for RemoteNodeStatusSource {
    async fn fetch_nodes(&self) -> Result<Vec<NodeStatus>, NodeSourceError> {
        let mut request = self.client.get(&self.config.nodes_info_url);
        if let Some(authorization) = self.config.authorization() {
            request = request.header(header::AUTHORIZATION, authorization);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                NodeSourceError::Unavailable(format!(
                    "request timed out after {}s",
                    self.config.timeout.as_secs()
                ))
            } else if e.is_connect() {
                NodeSourceError::Unavailable(format!("connection failed: {}", e))
            } else {
                NodeSourceError::Unavailable(e.to_string())
            }
        })?;

        let status = response.status();
        match status {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(NodeSourceError::Rejected(format!("status {}", status)));
            }
            _ => {
                return Err(NodeSourceError::Unavailable(format!(
                    "unexpected status {}",
                    status
                )));
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| NodeSourceError::Unavailable(format!("failed to read body: {}", e)))?;

        let parsed: NodesResponse = serde_json::from_slice(&body)
            .map_err(|e| NodeSourceError::Malformed(e.to_string()))?;

        Ok(parsed.nodes)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
