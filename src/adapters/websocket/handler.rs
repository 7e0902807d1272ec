//! WebSocket upgrade handler for dashboard viewers.
//!
//! Connection lifecycle:
//! 1. Upgrade to WebSocket
//! 2. Queue the greeting (`connected` + current `status`) on the new buffer
//! 3. Register with the hub and pump frames until either side stops
//! 4. Unregister

use axum::{
    extract::{
        ws::{WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::StreamExt;

use crate::application::HealthHandle;
use crate::domain::foundation::{ConnectionId, Timestamp};

use super::connection::serve_connection;
use super::hub::HubHandle;
use super::messages::{Frame, ServerMessage};

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub hub: HubHandle,
    pub health: HealthHandle,
}

impl WebSocketState {
    pub fn new(hub: HubHandle, health: HealthHandle) -> Self {
        Self { hub, health }
    }
}

/// Handle WebSocket upgrade requests from dashboard viewers.
///
/// Route: `GET /ws`
///
/// Viewers are not authenticated; anyone who can reach the server can watch.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<WebSocketState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: WebSocketState) {
    let (connection, outbound) = state.hub.new_connection();
    let id = connection.id();

    for frame in greeting_frames(id, &state.health) {
        if !connection.enqueue(frame) {
            tracing::warn!(connection_id = %id, "Outbound buffer too small for greeting");
        }
    }

    tracing::info!(connection_id = %id, "Viewer connected");

    let (sink, stream) = socket.split();
    serve_connection(state.hub.clone(), connection, outbound, sink, stream).await;

    tracing::info!(connection_id = %id, "Viewer disconnected");
}

/// Frames a new viewer receives before any broadcast.
fn greeting_frames(id: ConnectionId, health: &HealthHandle) -> Vec<Frame> {
    [
        ServerMessage::connected(id),
        ServerMessage::status(health.summary(), Timestamp::now()),
    ]
    .iter()
    .filter_map(|message| match message.to_frame() {
        Ok(frame) => Some(frame),
        Err(e) => {
            tracing::error!(connection_id = %id, error = %e, "Failed to serialize greeting");
            None
        }
    })
    .collect()
}

/// Create axum router for the viewer endpoint.
pub fn websocket_router() -> Router<WebSocketState> {
    Router::new().route("/ws", get(ws_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::websocket::hub::{Hub, HubConfig};
    use crate::application::HealthMonitor;
    use crate::domain::health::{NodeStatus, LIVE};
    use crate::ports::{NodeSourceError, NodeStatusSource};
    use async_trait::async_trait;
    use axum::{body::Body, http::Request};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    struct TwoLiveNodes;

    #[async_trait]
    impl NodeStatusSource for TwoLiveNodes {
        async fn fetch_nodes(&self) -> Result<Vec<NodeStatus>, NodeSourceError> {
            Ok(vec![
                NodeStatus::new("node1", "local", LIVE),
                NodeStatus::new("node2", "local", LIVE),
            ])
        }

        fn name(&self) -> &'static str {
            "two-live"
        }
    }

    #[tokio::test]
    async fn greeting_carries_connection_id_and_current_summary() {
        let monitor = HealthMonitor::new(Arc::new(TwoLiveNodes), Duration::from_secs(1));
        monitor.poll_once().await;
        let id = ConnectionId::new();

        let frames = greeting_frames(id, &monitor.handle());

        assert_eq!(frames.len(), 2);
        let connected: serde_json::Value = serde_json::from_str(&frames[0]).unwrap();
        assert_eq!(connected["type"], "connected");
        assert_eq!(connected["connectionId"], id.to_string());

        let status: serde_json::Value = serde_json::from_str(&frames[1]).unwrap();
        assert_eq!(status["type"], "status");
        assert_eq!(status["summary"], "2 node(s) LIVE");
    }

    #[tokio::test]
    async fn plain_get_without_upgrade_is_rejected() {
        let (_hub, hub) = Hub::new(HubConfig::default());
        let monitor = HealthMonitor::new(Arc::new(TwoLiveNodes), Duration::from_secs(1));
        let app = websocket_router().with_state(WebSocketState::new(hub, monitor.handle()));

        let response = app
            .oneshot(Request::builder().uri("/ws").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }
}
