//! Events pushed to dashboard viewers.

use super::foundation::{RecordId, Timestamp};
use super::workload::Bid;

/// Something viewers should hear about.
///
/// Produced by the workload generator and the health monitor, fanned out
/// to every connected viewer by the broadcast hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    /// A synthetic record was persisted.
    RecordProduced(Bid),

    /// The rendered cluster health summary changed.
    HealthChanged { summary: String, at: Timestamp },

    /// A synthetic record could not be persisted.
    PersistFailed {
        record_id: RecordId,
        reason: String,
        at: Timestamp,
    },
}

impl DashboardEvent {
    pub fn health_changed(summary: impl Into<String>) -> Self {
        Self::HealthChanged {
            summary: summary.into(),
            at: Timestamp::now(),
        }
    }

    pub fn persist_failed(record_id: RecordId, reason: impl Into<String>) -> Self {
        Self::PersistFailed {
            record_id,
            reason: reason.into(),
            at: Timestamp::now(),
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RecordProduced(_) => "record_produced",
            Self::HealthChanged { .. } => "health_changed",
            Self::PersistFailed { .. } => "persist_failed",
        }
    }
}
