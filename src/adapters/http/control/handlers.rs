//! HTTP handlers for generator control and health endpoints.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect};

use crate::adapters::websocket::HubHandle;
use crate::application::{
    GeneratorError, HealthHandle, StartOutcome, StopOutcome, WorkloadGenerator,
};
use crate::domain::workload::MAX_CONCURRENCY;

use super::dto::{ErrorResponse, GeneratorStatus, HealthResponse, UpdateGeneratorRequest};

// ════════════════════════════════════════════════════════════════════════════════
// Error Type
// ════════════════════════════════════════════════════════════════════════════════

/// Control API error that implements IntoResponse.
#[derive(Debug)]
pub enum ControlApiError {
    BadRequest(String),
    Conflict(String),
}

impl IntoResponse for ControlApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ControlApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            ControlApiError::Conflict(msg) => (StatusCode::CONFLICT, ErrorResponse::conflict(msg)),
        };
        (status, Json(error)).into_response()
    }
}

impl From<GeneratorError> for ControlApiError {
    fn from(error: GeneratorError) -> Self {
        match error {
            GeneratorError::RunActive(_) => ControlApiError::Conflict(error.to_string()),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ControlAppState {
    pub generator: Arc<WorkloadGenerator>,
    pub health: HealthHandle,
    pub hub: HubHandle,
    /// Where `/start` and `/stop` send the browser afterwards.
    pub redirect_url: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /start
///
/// Starts the generator (no-op if running) and redirects to the dashboard.
pub async fn start_generator(State(state): State<ControlAppState>) -> Redirect {
    match state.generator.start() {
        StartOutcome::Started(run_id) => tracing::debug!(run_id = %run_id, "Start requested"),
        StartOutcome::AlreadyRunning(run_id) => {
            tracing::debug!(run_id = %run_id, "Start requested while running")
        }
    }
    Redirect::to(&state.redirect_url)
}

/// GET /stop
pub async fn stop_generator(State(state): State<ControlAppState>) -> Redirect {
    if let StopOutcome::NotRunning = state.generator.stop() {
        tracing::debug!("Stop requested while idle");
    }
    Redirect::to(&state.redirect_url)
}

/// GET /api/generator
pub async fn get_generator(State(state): State<ControlAppState>) -> Json<GeneratorStatus> {
    Json(state.generator.status())
}

/// PUT /api/generator
///
/// Changes concurrency and pacing. Rejected with 409 while a run is active.
pub async fn update_generator(
    State(state): State<ControlAppState>,
    Json(request): Json<UpdateGeneratorRequest>,
) -> Result<Json<GeneratorStatus>, ControlApiError> {
    if request.is_empty() {
        return Err(ControlApiError::BadRequest(
            "Provide concurrency and/or wait_ms".to_string(),
        ));
    }
    if request.exceeds_max_concurrency() {
        return Err(ControlApiError::BadRequest(format!(
            "concurrency must not exceed {}",
            MAX_CONCURRENCY
        )));
    }

    let settings = state
        .generator
        .settings()
        .merge(request.concurrency, request.wait_ms);
    state.generator.reconfigure(settings)?;

    Ok(Json(state.generator.status()))
}

/// GET /api/health
pub async fn get_health(State(state): State<ControlAppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        summary: state.health.summary(),
        viewers: state.hub.connection_count().await,
    })
}

/// GET /healthz
pub async fn liveness() -> &'static str {
    "ok"
}
