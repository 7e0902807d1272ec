//! Control HTTP adapter module.
//!
//! Generator start/stop, generator settings and health endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ErrorResponse, HealthResponse, UpdateGeneratorRequest};
pub use handlers::{ControlAppState, ControlApiError};
pub use routes::control_router;
