//! HTTP adapters - The server's public surface.
//!
//! [`app_router`] assembles everything the binary serves:
//! - `/ws` - viewer WebSocket
//! - `/start`, `/stop`, `/api/*`, `/healthz` - control endpoints
//! - any other path - static dashboard files

pub mod control;

use std::path::Path;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::adapters::websocket::{websocket_router, WebSocketState};

pub use control::{control_router, ControlAppState};

/// Build the full application router.
pub fn app_router(control: ControlAppState, static_dir: impl AsRef<Path>) -> Router {
    let websocket = WebSocketState::new(control.hub.clone(), control.health.clone());

    Router::new()
        .merge(websocket_router().with_state(websocket))
        .merge(control_router().with_state(control))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}
