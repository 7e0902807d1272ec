//! PostgreSQL adapters - Database implementations of the storage and
//! local health ports.
//!
//! - `PostgresRecordStore` - Inserts synthetic bids
//! - `PostgresNodeStatusSource` - Reads node liveness from the gossip table

mod node_status;
mod record_store;

pub use node_status::PostgresNodeStatusSource;
pub use record_store::PostgresRecordStore;
