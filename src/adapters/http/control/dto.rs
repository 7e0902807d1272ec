//! HTTP DTOs for the control endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::workload::MAX_CONCURRENCY;

pub use crate::application::GeneratorStatus;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `PUT /api/generator`. Missing or non-positive fields keep their
/// current value or fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGeneratorRequest {
    pub concurrency: Option<i64>,
    pub wait_ms: Option<i64>,
}

impl UpdateGeneratorRequest {
    pub fn is_empty(&self) -> bool {
        self.concurrency.is_none() && self.wait_ms.is_none()
    }

    pub fn exceeds_max_concurrency(&self) -> bool {
        self.concurrency
            .is_some_and(|concurrency| concurrency > MAX_CONCURRENCY as i64)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub summary: String,
    /// Connected viewers; absent if the hub has shut down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewers: Option<usize>,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            code: "CONFLICT".to_string(),
            message: message.into(),
        }
    }
}
