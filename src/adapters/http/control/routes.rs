//! HTTP routes for generator control and health endpoints.

use axum::routing::get;
use axum::Router;

use super::handlers::{
    get_generator, get_health, liveness, start_generator, stop_generator, update_generator,
    ControlAppState,
};

/// Creates the control router.
pub fn control_router() -> Router<ControlAppState> {
    Router::new()
        .route("/start", get(start_generator))
        .route("/stop", get(stop_generator))
        .route("/api/generator", get(get_generator).put(update_generator))
        .route("/api/health", get(get_health))
        .route("/healthz", get(liveness))
}
