//! In-Memory Node Status Source
//!
//! Reports whatever node list (or error) was last set. Lets tests drive
//! the health monitor without a cluster.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::health::NodeStatus;
use crate::ports::{NodeSourceError, NodeStatusSource};

type Reply = Result<Vec<NodeStatus>, NodeSourceError>;

#[derive(Debug, Clone)]
pub struct InMemoryNodeStatusSource {
    reply: Arc<RwLock<Reply>>,
}

impl InMemoryNodeStatusSource {
    pub fn new(nodes: Vec<NodeStatus>) -> Self {
        Self {
            reply: Arc::new(RwLock::new(Ok(nodes))),
        }
    }

    pub async fn set_nodes(&self, nodes: Vec<NodeStatus>) {
        *self.reply.write().await = Ok(nodes);
    }

    /// Fail every subsequent fetch with `error` until nodes are set again.
    pub async fn fail_with(&self, error: NodeSourceError) {
        *self.reply.write().await = Err(error);
    }
}

impl Default for InMemoryNodeStatusSource {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl NodeStatusSource for InMemoryNodeStatusSource {
    async fn fetch_nodes(&self) -> Result<Vec<NodeStatus>, NodeSourceError> {
        self.reply.read().await.clone()
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
