//! Aggregated cluster health.
//!
//! Counts are rebuilt from scratch on every poll; a node that disappears
//! between two polls simply stops being counted.

use std::collections::BTreeMap;
use std::fmt;

use super::node::{NodeStatus, LIVE};

/// Separator between the per-label segments of a mixed summary.
pub const SEGMENT_SEPARATOR: &str = " | ";

/// Rendering of a summary whose source could not produce node data.
pub const UNKNOWN_SUMMARY: &str = "cluster status unknown";

/// Node count per status label, ordered lexicographically by label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeCounts(BTreeMap<String, usize>);

impl NodeCounts {
    /// Counts nodes per status label.
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a NodeStatus>) -> Self {
        let mut counts = BTreeMap::new();
        for node in nodes {
            *counts.entry(node.status.clone()).or_insert(0) += 1;
        }
        Self(counts)
    }

    pub fn get(&self, label: &str) -> usize {
        self.0.get(label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when no label other than `LIVE` is present.
    pub fn all_live(&self) -> bool {
        self.0.keys().all(|label| label == LIVE)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(label, count)| (label.as_str(), *count))
    }
}

impl fmt::Display for NodeCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.all_live() {
            return write!(f, "{} node(s) {}", self.get(LIVE), LIVE);
        }
        let segments: Vec<String> = self
            .iter()
            .map(|(label, count)| format!("{} node(s) {}", count, label))
            .collect();
        f.write_str(&segments.join(SEGMENT_SEPARATOR))
    }
}

/// Latest known state of the cluster, replaced wholesale every poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthSnapshot {
    Known(NodeCounts),
    /// The source reported a fatal or empty condition.
    Unknown { reason: String },
}

impl HealthSnapshot {
    pub fn from_nodes(nodes: &[NodeStatus]) -> Self {
        Self::Known(NodeCounts::from_nodes(nodes))
    }

    pub fn unknown(reason: impl Into<String>) -> Self {
        Self::Unknown {
            reason: reason.into(),
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Human-readable summary sent to viewers.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl Default for HealthSnapshot {
    fn default() -> Self {
        Self::Known(NodeCounts::default())
    }
}

impl fmt::Display for HealthSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(counts) => fmt::Display::fmt(counts, f),
            Self::Unknown { .. } => f.write_str(UNKNOWN_SUMMARY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::health::DEAD;
    use proptest::prelude::*;

    fn nodes(statuses: &[&str]) -> Vec<NodeStatus> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| NodeStatus::new(format!("node{}", i + 1), "local", *status))
            .collect()
    }

    #[test]
    fn all_live_renders_single_count() {
        let snapshot = HealthSnapshot::from_nodes(&nodes(&[LIVE; 5]));
        assert_eq!(snapshot.summary(), "5 node(s) LIVE");
    }

    #[test]
    fn mixed_statuses_render_sorted_segments() {
        let snapshot = HealthSnapshot::from_nodes(&nodes(&[LIVE, LIVE, DEAD, LIVE, LIVE]));
        assert_eq!(snapshot.summary(), "1 node(s) DEAD | 4 node(s) LIVE");
    }

    #[test]
    fn labels_without_live_nodes_still_sorted() {
        let snapshot = HealthSnapshot::from_nodes(&nodes(&["SUSPECT", DEAD, "DECOMMISSIONING", DEAD]));
        assert_eq!(
            snapshot.summary(),
            "2 node(s) DEAD | 1 node(s) DECOMMISSIONING | 1 node(s) SUSPECT"
        );
    }

    #[test]
    fn empty_snapshot_reports_zero_live() {
        assert_eq!(HealthSnapshot::default().summary(), "0 node(s) LIVE");
    }

    #[test]
    fn unknown_snapshot_has_fixed_summary() {
        let snapshot = HealthSnapshot::unknown("credentials rejected");
        assert!(!snapshot.is_known());
        assert_eq!(snapshot.summary(), UNKNOWN_SUMMARY);
    }

    #[test]
    fn counts_are_rebuilt_not_patched() {
        let before = NodeCounts::from_nodes(&nodes(&[LIVE, DEAD, DEAD]));
        let after = NodeCounts::from_nodes(&nodes(&[LIVE]));
        assert_eq!(before.get(DEAD), 2);
        assert_eq!(after.get(DEAD), 0);
        assert_eq!(after.to_string(), "1 node(s) LIVE");
    }

    fn label() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(LIVE.to_string()),
            Just(DEAD.to_string()),
            "[A-Z]{3,10}",
        ]
    }

    proptest! {
        #[test]
        fn total_matches_node_count(labels in prop::collection::vec(label(), 0..40)) {
            let nodes: Vec<NodeStatus> = labels
                .iter()
                .map(|status| NodeStatus::new("n", "r", status.clone()))
                .collect();
            prop_assert_eq!(NodeCounts::from_nodes(&nodes).total(), nodes.len());
        }

        #[test]
        fn mixed_summary_has_one_sorted_segment_per_label(labels in prop::collection::vec(label(), 1..40)) {
            let nodes: Vec<NodeStatus> = labels
                .iter()
                .map(|status| NodeStatus::new("n", "r", status.clone()))
                .collect();
            let counts = NodeCounts::from_nodes(&nodes);
            prop_assume!(!counts.all_live());

            let summary = counts.to_string();
            let rendered: Vec<&str> = summary
                .split(SEGMENT_SEPARATOR)
                .map(|segment| segment.rsplit(' ').next().unwrap())
                .collect();
            let mut sorted = rendered.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(rendered, sorted);
        }
    }
}
