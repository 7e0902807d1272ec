//! In-memory adapters - Process-local implementations of the storage and
//! health source ports.

mod node_status;
mod record_store;

pub use node_status::InMemoryNodeStatusSource;
pub use record_store::{InMemoryRecordStore, DEFAULT_RETAINED_RECORDS};
