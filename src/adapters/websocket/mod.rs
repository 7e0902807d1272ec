//! WebSocket adapters for the live dashboard.
//!
//! Pushes generated records and cluster status to every connected viewer.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │  WorkloadGenerator   │   │    HealthMonitor     │
//! └──────────┬───────────┘   └──────────┬───────────┘
//!            │ EventPublisher::publish  │
//!            ▼                          ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Hub (one task)                             │
//! │   register ─┐                                                       │
//! │   unregister┼─► select! loop ─► HashMap<ConnectionId, Connection>   │
//! │   broadcast ┘                                                       │
//! └─────────────────────────────────────────────────────────────────────┘
//!            │ try_send (full or closed → evicted)
//!            ▼
//! ┌───────────────────┐ ┌───────────────────┐ ┌───────────────────┐
//! │ outbound buffer   │ │ outbound buffer   │ │ outbound buffer   │
//! │ write pump → ws   │ │ write pump → ws   │ │ write pump → ws   │
//! │ read pump  ← ws   │ │ read pump  ← ws   │ │ read pump  ← ws   │
//! └───────────────────┘ └───────────────────┘ └───────────────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - Server → client message protocol
//! - [`hub`] - Connection registry and fan-out loop
//! - [`connection`] - Per-viewer read and write pumps
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod connection;
pub mod handler;
pub mod hub;
pub mod messages;

pub use connection::serve_connection;
pub use handler::{websocket_router, ws_handler, WebSocketState};
pub use hub::{Connection, Hub, HubConfig, HubHandle, DEFAULT_OUTBOUND_BUFFER, DEFAULT_QUEUE_CAPACITY};
pub use messages::{
    ConnectedMessage, ErrorMessage, Frame, RecordMessage, ServerMessage, StatusMessage,
};
