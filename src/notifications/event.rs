//! Event types for queue notifications

use crate::queue::api::SubscriberId;
use std::time::SystemTime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueueEventType {
    Created,
    Subscribed,
    Unsubscribed,
    /// Message dropped on enqueue because nobody was subscribed
    Discarded,
    /// Fully delivered messages left the buffer
    Evicted,
    /// Oldest messages dropped by a shrinking resize
    Truncated,
    Resized,
    /// Message taken out explicitly through `remove_message`
    Removed,
    Closed,
}

/// Notification published by a queue whenever its observable state changes
#[derive(Clone, Debug)]
pub struct QueueEvent {
    pub event_type: QueueEventType,
    pub timestamp: SystemTime,
    pub queue_id: String,
    pub size: Option<usize>,
    pub subscriber: Option<SubscriberId>,
}

impl QueueEvent {
    pub fn new(event_type: QueueEventType, queue_id: String) -> Self {
        Self {
            event_type,
            timestamp: SystemTime::now(),
            queue_id,
            size: None,
            subscriber: None,
        }
    }

    pub fn with_size(event_type: QueueEventType, queue_id: String, size: usize) -> Self {
        Self {
            size: Some(size),
            ..Self::new(event_type, queue_id)
        }
    }
}
