//! Application layer - The long-running services behind the dashboard.
//!
//! Both services talk to the outside world only through ports, so the
//! same code runs against PostgreSQL and the cluster API in production and
//! against in-memory fakes in tests.
//!
//! - `WorkloadGenerator` - start/stop controlled synthetic write traffic
//! - `HealthMonitor` - periodic node status polling and summary rendering

mod health_monitor;
mod workload_generator;

pub use health_monitor::{HealthHandle, HealthMonitor, PollOutcome, DEFAULT_POLL_INTERVAL};
pub use workload_generator::{
    GeneratorError, GeneratorStatus, StartOutcome, StopOutcome, WorkloadGenerator,
};
