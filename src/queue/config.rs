//! Queue configuration
//!
//! Deserialized from the `[queue]` table of a TOML configuration file.

use crate::notifications::api::DEFAULT_EVENT_CAPACITY;
use crate::queue::error::{QueueError, QueueResult};
use serde::Deserialize;

pub const DEFAULT_QUEUE_ID: &str = "global";
pub const DEFAULT_CAPACITY: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueConfig {
    /// Identifier used in logs and events
    pub queue_id: String,
    /// Maximum number of queued messages
    pub capacity: usize,
    /// Events buffered per event listener
    pub event_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            queue_id: DEFAULT_QUEUE_ID.to_string(),
            capacity: DEFAULT_CAPACITY,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl QueueConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> QueueResult<()> {
        if self.capacity == 0 {
            return Err(QueueError::InvalidCapacity {
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}
