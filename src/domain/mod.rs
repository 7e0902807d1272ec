//! Domain layer containing the dashboard's business types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, errors)
//! - `workload` - Synthetic bids and generator settings
//! - `health` - Node statuses and the aggregated health summary
//! - `events` - Events fanned out to viewers

pub mod events;
pub mod foundation;
pub mod health;
pub mod workload;

pub use events::DashboardEvent;
