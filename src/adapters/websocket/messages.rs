//! WebSocket message types for the live dashboard.
//!
//! Server → Client only: viewers receive a connection greeting, generated
//! records, cluster status and persistence errors. Frames sent by viewers
//! are ignored.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{ConnectionId, ErrorCode, Timestamp};
use crate::domain::workload::Bid;
use crate::domain::DashboardEvent;

/// Serialized JSON text of one server message, shared across viewers.
pub type Frame = Arc<str>;

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established successfully.
    Connected(ConnectedMessage),

    /// A synthetic record was written to the cluster.
    Record(RecordMessage),

    /// Cluster health summary.
    Status(StatusMessage),

    /// Error occurred.
    Error(ErrorMessage),
}

/// Sent once when a viewer connects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub connection_id: String,
    pub timestamp: String,
}

/// A generated record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMessage {
    pub id: String,
    pub bidder: String,
    pub item: String,
    pub amount_cents: i64,
    pub region: String,
    pub created_at: String,
}

/// Cluster health summary, e.g. `"5 node(s) LIVE"`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusMessage {
    pub summary: String,
    pub timestamp: String,
}

/// Error message sent to client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    pub timestamp: String,
}

impl ServerMessage {
    pub fn connected(connection_id: ConnectionId) -> Self {
        ServerMessage::Connected(ConnectedMessage {
            connection_id: connection_id.to_string(),
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }

    pub fn status(summary: impl Into<String>, at: Timestamp) -> Self {
        ServerMessage::Status(StatusMessage {
            summary: summary.into(),
            timestamp: at.to_rfc3339(),
        })
    }

    /// Serialize once for fan-out.
    pub fn to_frame(&self) -> Result<Frame, serde_json::Error> {
        serde_json::to_string(self).map(Frame::from)
    }
}

impl From<Bid> for RecordMessage {
    fn from(bid: Bid) -> Self {
        Self {
            id: bid.id.to_string(),
            bidder: bid.bidder,
            item: bid.item,
            amount_cents: bid.amount_cents,
            region: bid.region,
            created_at: bid.created_at.to_rfc3339(),
        }
    }
}

impl From<DashboardEvent> for ServerMessage {
    fn from(event: DashboardEvent) -> Self {
        match event {
            DashboardEvent::RecordProduced(bid) => ServerMessage::Record(bid.into()),
            DashboardEvent::HealthChanged { summary, at } => ServerMessage::status(summary, at),
            DashboardEvent::PersistFailed {
                record_id,
                reason,
                at,
            } => ServerMessage::Error(ErrorMessage {
                code: ErrorCode::DatabaseError.to_string(),
                message: reason,
                record_id: Some(record_id.to_string()),
                timestamp: at.to_rfc3339(),
            }),
        }
    }
}
