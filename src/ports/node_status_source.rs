//! NodeStatusSource port - Where the health monitor reads node statuses.
//!
//! Two interchangeable implementations exist: a direct query against the
//! database (local mode) and an authenticated request to a remote cluster
//! status API (remote mode). The monitor never knows which one it has.

use async_trait::async_trait;

use crate::domain::health::NodeStatus;

/// Errors a node status source can report for one poll.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NodeSourceError {
    /// Source unreachable or query failed; try again next cycle.
    #[error("Node status source unavailable: {0}")]
    Unavailable(String),

    /// Source answered with something that is not a node list.
    #[error("Malformed node status response: {0}")]
    Malformed(String),

    /// Source refused the request (credentials rejected). Retrying will
    /// not help until the deployment is fixed.
    #[error("Node status request rejected: {0}")]
    Rejected(String),
}

impl NodeSourceError {
    /// Whether this error leaves the monitor without any usable status.
    pub fn is_fatal(&self) -> bool {
        matches!(self, NodeSourceError::Rejected(_))
    }
}

/// Port for fetching the current per-node status list.
#[async_trait]
pub trait NodeStatusSource: Send + Sync {
    /// Fetch every node with its status label.
    async fn fetch_nodes(&self) -> Result<Vec<NodeStatus>, NodeSourceError>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}
