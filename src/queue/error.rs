//! Queue Error Types

use crate::queue::registry::SubscriberId;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Invalid queue capacity: {capacity} (must be greater than 0)")]
    InvalidCapacity { capacity: usize },

    #[error("Subscriber not registered: {subscriber}")]
    NotSubscribed { subscriber: SubscriberId },

    #[error("Allocation failed for {what}")]
    AllocationFailure { what: String },

    #[error("Queue is closed")]
    Closed,

    #[error("Queue lock poisoned: {message}")]
    Poisoned { message: String },
}

impl QueueError {
    pub(crate) fn allocation(what: &str) -> Self {
        QueueError::AllocationFailure {
            what: what.to_string(),
        }
    }
}

impl crate::core::error_handling::ContextualError for QueueError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            QueueError::InvalidCapacity { .. } | QueueError::NotSubscribed { .. }
        )
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            QueueError::InvalidCapacity { .. } => {
                Some("Queue capacity must be a positive number of messages")
            }
            QueueError::NotSubscribed { .. } => {
                Some("The subscriber must subscribe before receiving messages")
            }
            _ => None,
        }
    }
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
