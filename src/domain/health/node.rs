//! Per-node status as reported by a cluster status source.

use serde::{Deserialize, Serialize};

/// Status label of a healthy node.
pub const LIVE: &str = "LIVE";
/// Status label of a node the cluster considers gone.
pub const DEAD: &str = "DEAD";

/// One node of the monitored cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStatus {
    pub name: String,
    #[serde(rename = "region_name")]
    pub region: String,
    pub status: String,
}

impl NodeStatus {
    pub fn new(name: impl Into<String>, region: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            status: status.into(),
        }
    }

    /// Builds a node from a gossip row (`node_id`, `is_live`).
    pub fn from_gossip(node_id: i64, is_live: bool) -> Self {
        Self::new(
            format!("node{}", node_id),
            "local",
            if is_live { LIVE } else { DEAD },
        )
    }
}
