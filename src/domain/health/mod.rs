//! Cluster health domain - node statuses and their aggregate.

mod node;
mod summary;

pub use node::{NodeStatus, DEAD, LIVE};
pub use summary::{HealthSnapshot, NodeCounts, SEGMENT_SEPARATOR, UNKNOWN_SUMMARY};
