//! In-Memory Record Store Adapter
//!
//! Keeps the most recent bids in memory. Used when no database is
//! configured and in tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::domain::workload::Bid;
use crate::ports::RecordStore;

/// Bids retained by [`InMemoryRecordStore::new`].
pub const DEFAULT_RETAINED_RECORDS: usize = 1_000;

/// In-memory storage for synthetic records.
#[derive(Debug, Clone)]
pub struct InMemoryRecordStore {
    recent: Arc<RwLock<VecDeque<Bid>>>,
    total: Arc<AtomicU64>,
    capacity: usize,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RETAINED_RECORDS)
    }

    /// Retain at most `capacity` bids; older ones are discarded.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            recent: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            total: Arc::new(AtomicU64::new(0)),
            capacity: capacity.max(1),
        }
    }

    /// Number of bids ever persisted.
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Retained bids, oldest first.
    pub async fn recent(&self) -> Vec<Bid> {
        self.recent.read().await.iter().cloned().collect()
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn persist(&self, bid: &Bid) -> Result<(), DomainError> {
        let mut recent = self.recent.write().await;
        if recent.len() == self.capacity {
            recent.pop_front();
        }
        recent.push_back(bid.clone());
        self.total.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
