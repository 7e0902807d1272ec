//! Broadcast hub configuration

use serde::Deserialize;

use crate::adapters::websocket::{HubConfig, DEFAULT_OUTBOUND_BUFFER, DEFAULT_QUEUE_CAPACITY};

use super::error::ValidationError;

/// Broadcast hub configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HubSettings {
    /// Frames buffered per viewer before it is considered too slow
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,

    /// Capacity of each hub command channel
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl HubSettings {
    pub fn hub_config(&self) -> HubConfig {
        HubConfig {
            outbound_buffer: self.outbound_buffer,
            queue_capacity: self.queue_capacity,
        }
    }

    /// Validate hub configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        // Greeting frames are queued before registration.
        if self.outbound_buffer < 2 || self.queue_capacity == 0 {
            return Err(ValidationError::InvalidHubCapacity);
        }
        Ok(())
    }
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            outbound_buffer: default_outbound_buffer(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_outbound_buffer() -> usize {
    DEFAULT_OUTBOUND_BUFFER
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}
