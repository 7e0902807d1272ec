//! Cluster API adapters - HTTP implementation of the health source port.

mod remote_status;

pub use remote_status::{RemoteNodeStatusSource, RemoteStatusConfig, DEFAULT_REQUEST_TIMEOUT};
