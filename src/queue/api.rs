//! Public API for the queue system
//!
//! External modules should import from here rather than directly from internal modules.
//! See the module documentation of [`crate::queue`] for the delivery rules.

// Core queue and handles
pub use crate::queue::internal::BroadcastQueue;
pub use crate::queue::publisher::QueuePublisher;
pub use crate::queue::subscription::Subscription;

// Identities
pub use crate::queue::registry::SubscriberId;

// Configuration
pub use crate::queue::config::{QueueConfig, DEFAULT_CAPACITY, DEFAULT_QUEUE_ID};

// Error handling
pub use crate::queue::error::{QueueError, QueueResult};

// Outcomes and statistics
pub use crate::queue::types::{EnqueueOutcome, QueueStats};
