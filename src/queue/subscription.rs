//! Subscription handle for receiving messages
//!
//! A [`Subscription`] owns one subscriber identity. It subscribes when it is
//! created and unsubscribes when dropped, so a consumer thread that exits
//! early never holds messages back from eviction.

use crate::queue::error::{QueueError, QueueResult};
use crate::queue::internal::BroadcastQueue;
use crate::queue::registry::SubscriberId;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// RAII subscriber handle
///
/// # Example
///
/// ```rust
/// # use pubqueue::queue::api::BroadcastQueue;
/// # use std::sync::Arc;
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let queue = Arc::new(BroadcastQueue::new(4)?);
/// let subscription = queue.subscription("reader")?;
///
/// queue.enqueue(1_u32)?;
/// queue.enqueue(2_u32)?;
/// let batch = subscription.receive_batch(10)?;
/// assert_eq!(batch.iter().map(|m| **m).collect::<Vec<_>>(), vec![1, 2]);
///
/// drop(subscription);
/// assert_eq!(queue.subscriber_count()?, 0);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug)]
pub struct Subscription<T> {
    name: String,
    subscriber: SubscriberId,
    queue: Weak<BroadcastQueue<T>>,
}

impl<T> Subscription<T> {
    pub(crate) fn new(name: String, queue: &Arc<BroadcastQueue<T>>) -> QueueResult<Self> {
        let subscriber = queue.new_subscriber_id();
        queue.subscribe(subscriber)?;
        Ok(Self {
            name,
            subscriber,
            queue: Arc::downgrade(queue),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subscriber_id(&self) -> SubscriberId {
        self.subscriber
    }

    fn queue(&self) -> QueueResult<Arc<BroadcastQueue<T>>> {
        self.queue.upgrade().ok_or(QueueError::Closed)
    }

    /// Receive the next message for this subscription, blocking while the queue is empty
    pub fn receive(&self) -> QueueResult<Option<Arc<T>>> {
        self.queue()?.receive(self.subscriber)
    }

    pub fn receive_timeout(&self, timeout: Duration) -> QueueResult<Option<Arc<T>>> {
        self.queue()?.receive_timeout(self.subscriber, timeout)
    }

    /// Receive up to `max` messages without blocking
    ///
    /// Stops at the first "nothing new": when the head message was already
    /// delivered to this subscription the batch ends there, even if later
    /// messages are pending behind it.
    pub fn receive_batch(&self, max: usize) -> QueueResult<Vec<Arc<T>>> {
        let queue = self.queue()?;
        let mut batch = Vec::with_capacity(max.min(queue.available_count(self.subscriber)?));
        while batch.len() < max && queue.available_count(self.subscriber)? > 0 {
            match queue.receive(self.subscriber)? {
                Some(message) => batch.push(message),
                None => break,
            }
        }
        Ok(batch)
    }

    /// Messages queued for this subscription that it has not received yet
    pub fn available(&self) -> QueueResult<usize> {
        self.queue()?.available_count(self.subscriber)
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(queue) = self.queue.upgrade() {
            if let Err(e) = queue.unsubscribe(self.subscriber) {
                log::warn!("{} failed to unsubscribe on drop: {}", self.name, e);
            }
        }
    }
}

impl<T> BroadcastQueue<T> {
    /// Subscribe a new identity and wrap it in a [`Subscription`]
    pub fn subscription(self: &Arc<Self>, name: impl Into<String>) -> QueueResult<Subscription<T>> {
        Subscription::new(name.into(), self)
    }
}
