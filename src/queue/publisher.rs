//! Queue Publisher for sending messages
//!
//! Publishers hand messages to a shared [`BroadcastQueue`]. A publisher only
//! holds a weak reference, so it never keeps a dropped queue alive.

use crate::queue::error::{QueueError, QueueResult};
use crate::queue::internal::BroadcastQueue;
use crate::queue::types::EnqueueOutcome;
use std::sync::{Arc, Weak};

/// Publisher handle for sending messages to the queue
///
/// # Example
///
/// ```rust
/// # use pubqueue::queue::api::{BroadcastQueue, QueuePublisher};
/// # use std::sync::Arc;
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let queue = Arc::new(BroadcastQueue::new(4)?);
/// let subscription = queue.subscription("reader")?;
/// let publisher = queue.publisher("producer-1");
///
/// publisher.publish("hello".to_string())?;
/// assert_eq!(subscription.available()?, 1);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug)]
pub struct QueuePublisher<T> {
    producer_id: String,
    queue: Weak<BroadcastQueue<T>>,
}

impl<T> Clone for QueuePublisher<T> {
    fn clone(&self) -> Self {
        Self {
            producer_id: self.producer_id.clone(),
            queue: Weak::clone(&self.queue),
        }
    }
}

impl<T> QueuePublisher<T> {
    pub(crate) fn new(producer_id: String, queue: Weak<BroadcastQueue<T>>) -> Self {
        Self { producer_id, queue }
    }

    pub fn producer_id(&self) -> &str {
        &self.producer_id
    }

    fn queue(&self) -> QueueResult<Arc<BroadcastQueue<T>>> {
        self.queue.upgrade().ok_or(QueueError::Closed)
    }

    /// Publish a message, blocking while the queue is full
    pub fn publish(&self, message: T) -> QueueResult<EnqueueOutcome> {
        let outcome = self.queue()?.enqueue(message)?;
        if let EnqueueOutcome::Queued { sequence } = outcome {
            log::trace!("{} published message #{}", self.producer_id, sequence);
        }
        Ok(outcome)
    }
}

impl<T> BroadcastQueue<T> {
    /// Create a publisher handle for `producer_id`
    pub fn publisher(self: &Arc<Self>, producer_id: impl Into<String>) -> QueuePublisher<T> {
        QueuePublisher::new(producer_id.into(), Arc::downgrade(self))
    }
}
