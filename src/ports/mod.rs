//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the core services and the outside world. Adapters implement these ports.
//!
//! - `EventPublisher` - Push dashboard events to viewers (implemented by the hub)
//! - `RecordStore` - Persist synthetic records
//! - `NodeStatusSource` - Read per-node cluster status (local SQL or remote HTTP)

mod event_publisher;
mod node_status_source;
mod record_store;

pub use event_publisher::EventPublisher;
pub use node_status_source::{NodeSourceError, NodeStatusSource};
pub use record_store::RecordStore;
