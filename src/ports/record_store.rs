//! RecordStore port - Persistence of synthetic records.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::workload::Bid;

/// Port for persisting generated records.
///
/// Any error is treated by the generator as a recoverable, per-record
/// failure; implementations should not retry internally.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist one record.
    async fn persist(&self, bid: &Bid) -> Result<(), DomainError>;
}
