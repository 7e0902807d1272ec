//! PostgreSQL implementation of NodeStatusSource (local mode).
//!
//! Reads liveness straight from the cluster's gossip table over the same
//! connection pool the generator writes through. Only nodes holding at
//! least one range are reported.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::health::NodeStatus;
use crate::ports::{NodeSourceError, NodeStatusSource};

const GOSSIP_NODES_QUERY: &str =
    "SELECT node_id, is_live FROM crdb_internal.gossip_nodes WHERE ranges > 0";

#[derive(Clone)]
pub struct PostgresNodeStatusSource {
    pool: PgPool,
}

impl PostgresNodeStatusSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NodeStatusSource for PostgresNodeStatusSource {
    async fn fetch_nodes(&self) -> Result<Vec<NodeStatus>, NodeSourceError> {
        let rows: Vec<(i64, bool)> = sqlx::query_as(GOSSIP_NODES_QUERY)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| NodeSourceError::Unavailable(format!("gossip query failed: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|(node_id, is_live)| NodeStatus::from_gossip(node_id, is_live))
            .collect())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
