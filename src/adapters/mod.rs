//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the core services to external systems:
//! - `websocket` - Viewer connections and the broadcast hub (`EventPublisher`)
//! - `postgres` - Bid storage and local node status (`RecordStore`, `NodeStatusSource`)
//! - `cluster_api` - Remote node status over HTTP (`NodeStatusSource`)
//! - `memory` - In-process stand-ins for storage and node status
//! - `http` - Control endpoints and the assembled application router

pub mod cluster_api;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod websocket;

pub use cluster_api::{RemoteNodeStatusSource, RemoteStatusConfig};
pub use http::{app_router, ControlAppState};
pub use memory::{InMemoryNodeStatusSource, InMemoryRecordStore};
pub use postgres::{PostgresNodeStatusSource, PostgresRecordStore};
pub use websocket::{Hub, HubConfig, HubHandle};
