//! Workload domain - synthetic records and generator settings.

mod bid;
mod settings;

pub use bid::{Bid, MAX_AMOUNT_CENTS, MIN_AMOUNT_CENTS};
pub use settings::{GeneratorSettings, DEFAULT_CONCURRENCY, DEFAULT_WAIT_MS, MAX_CONCURRENCY};
