//! Broadcast bus for queue events.
//!
//! [`QueueEventBus`] is a thin wrapper around [`tokio::sync::broadcast`].
//! Sending never blocks and works without a runtime, so the queue can publish
//! from inside its critical sections; listeners that fall behind lose the
//! oldest events rather than slowing the queue down.

use tokio::sync::broadcast;

use crate::notifications::event::QueueEvent;

/// Default number of events buffered per listener
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

#[derive(Clone, Debug)]
pub struct QueueEventBus {
    tx: broadcast::Sender<QueueEvent>,
}

impl QueueEventBus {
    /// Creates a bus buffering up to `capacity` events per listener (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all listeners.
    ///
    /// Having no listeners is not an error.
    pub fn publish(&self, event: QueueEvent) {
        log::trace!(
            "queue '{}' event {:?}",
            event.queue_id,
            event.event_type
        );
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.tx.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for QueueEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
