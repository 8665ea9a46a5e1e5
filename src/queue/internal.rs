//! BroadcastQueue: the synchronization layer
//!
//! All queue state (ring buffer, subscriber registry and every delivery row)
//! lives in one [`QueueState`] behind a single mutex. Two condition variables
//! coordinate blocking callers:
//! - `not_full`: producers wait here while the buffer is at capacity
//! - `not_empty`: receivers wait here while the buffer is empty
//!
//! Every wait runs in a loop that re-checks its predicate, so spurious
//! wake-ups and several waiters racing for one free slot are harmless.

use crate::core::sync::handle_mutex_poison;
use crate::notifications::api::{QueueEvent, QueueEventBus, QueueEventReceiver, QueueEventType};
use crate::queue::config::QueueConfig;
use crate::queue::delivery::{self, DeliveryRow};
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::registry::{SubscriberId, SubscriberRegistry};
use crate::queue::ring::{RingBuffer, Slot};
use crate::queue::types::{EnqueueOutcome, QueueStats};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Counters {
    enqueued: u64,
    discarded: u64,
    evicted: u64,
    truncated: u64,
    removed: u64,
}

#[derive(Debug)]
struct QueueState<T> {
    ring: RingBuffer<T>,
    registry: SubscriberRegistry,
    next_sequence: u64,
    closed: bool,
    counters: Counters,
}

/// Bounded broadcast queue delivering every message to every subscriber
///
/// Producers block in [`enqueue`](Self::enqueue) while the buffer is full.
/// Each subscriber receives every message stored while it was subscribed,
/// once, in enqueue order. A message leaves the buffer only after all of its
/// subscribers have received it or unsubscribed.
///
/// # Blocking receivers and unsubscribe
///
/// A receiver parked in [`receive`](Self::receive) re-checks its subscription
/// on every wake-up. Unsubscribing an identity from another thread wakes it,
/// and the parked call returns [`QueueError::NotSubscribed`].
///
/// # Example
///
/// ```rust
/// use pubqueue::queue::api::BroadcastQueue;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let queue = BroadcastQueue::new(2)?;
/// let alice = queue.new_subscriber_id();
/// queue.subscribe(alice)?;
///
/// assert!(queue.enqueue("m1".to_string())?.is_queued());
/// assert_eq!(queue.receive(alice)?.as_deref().map(String::as_str), Some("m1"));
/// assert!(queue.is_empty()?);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug)]
pub struct BroadcastQueue<T> {
    queue_id: String,
    state: Mutex<QueueState<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    next_subscriber_id: AtomicU64,
    events: QueueEventBus,
}

impl<T> BroadcastQueue<T> {
    /// Create a queue holding at most `capacity` messages
    pub fn new(capacity: usize) -> QueueResult<Self> {
        Self::with_config(&QueueConfig::with_capacity(capacity))
    }

    pub fn with_config(config: &QueueConfig) -> QueueResult<Self> {
        config.validate()?;
        let queue = Self {
            queue_id: config.queue_id.clone(),
            state: Mutex::new(QueueState {
                ring: RingBuffer::with_capacity(config.capacity)?,
                registry: SubscriberRegistry::new(),
                next_sequence: 1,
                closed: false,
                counters: Counters::default(),
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            next_subscriber_id: AtomicU64::new(1),
            events: QueueEventBus::new(config.event_capacity),
        };
        log::debug!(
            "queue '{}' created with capacity {}",
            queue.queue_id,
            config.capacity
        );
        queue.publish_event(QueueEventType::Created, Some(config.capacity), None);
        Ok(queue)
    }

    pub fn queue_id(&self) -> &str {
        &self.queue_id
    }

    /// Listen for [`QueueEvent`]s published by this queue
    pub fn events(&self) -> QueueEventReceiver {
        self.events.subscribe()
    }

    /// Issue a fresh subscriber identity; it still has to be subscribed
    pub fn new_subscriber_id(&self) -> SubscriberId {
        SubscriberId::from_raw(self.next_subscriber_id.fetch_add(1, Ordering::SeqCst))
    }

    fn lock(&self) -> QueueResult<MutexGuard<'_, QueueState<T>>> {
        handle_mutex_poison(self.state.lock(), |message| QueueError::Poisoned { message })
    }

    fn publish_event(
        &self,
        event_type: QueueEventType,
        size: Option<usize>,
        subscriber: Option<SubscriberId>,
    ) {
        let mut event = QueueEvent::new(event_type, self.queue_id.clone());
        event.size = size;
        event.subscriber = subscriber;
        self.events.publish(event);
    }

    /// Account for evicted slots and wake producers waiting for space
    fn finish_eviction(&self, state: &mut QueueState<T>, evicted: Vec<Slot<T>>) {
        if evicted.is_empty() {
            return;
        }
        state.counters.evicted += evicted.len() as u64;
        self.publish_event(QueueEventType::Evicted, Some(evicted.len()), None);
        self.not_full.notify_all();
    }

    /// Register `subscriber`; returns false if it was already registered
    ///
    /// Messages already queued are never delivered to a new subscriber.
    pub fn subscribe(&self, subscriber: SubscriberId) -> QueueResult<bool> {
        let mut state = self.lock()?;
        if state.registry.contains(subscriber) {
            return Ok(false);
        }
        // Rows lacking a flag already count as delivered, so a partial
        // extension left behind by an allocation failure is harmless
        delivery::extend_rows(&mut state.ring, subscriber)?;
        state.registry.add(subscriber)?;
        log::debug!(
            "queue '{}': {} subscribed ({} subscribers, {} backlog messages skipped)",
            self.queue_id,
            subscriber,
            state.registry.len(),
            state.ring.len()
        );
        self.publish_event(
            QueueEventType::Subscribed,
            Some(state.registry.len()),
            Some(subscriber),
        );
        Ok(true)
    }

    /// Remove `subscriber`; returns false if it was not registered
    ///
    /// Every queued message is marked delivered for the subscriber, which may
    /// evict several messages at once. Receivers parked for this identity are
    /// woken and fail with [`QueueError::NotSubscribed`].
    pub fn unsubscribe(&self, subscriber: SubscriberId) -> QueueResult<bool> {
        let mut state = self.lock()?;
        if !state.registry.remove(subscriber) {
            return Ok(false);
        }
        let forced = delivery::force_deliver(&mut state.ring, subscriber);
        let evicted = delivery::evict_delivered(&mut state.ring);
        log::debug!(
            "queue '{}': {} unsubscribed ({} pending messages released, {} evicted)",
            self.queue_id,
            subscriber,
            forced,
            evicted.len()
        );
        self.finish_eviction(&mut state, evicted);
        self.publish_event(
            QueueEventType::Unsubscribed,
            Some(state.registry.len()),
            Some(subscriber),
        );
        self.not_empty.notify_all();
        Ok(true)
    }

    /// Append a message, blocking while the buffer is full
    ///
    /// With no subscribers the message is discarded without being stored;
    /// this is reported as [`EnqueueOutcome::Discarded`], not as an error.
    pub fn enqueue(&self, message: T) -> QueueResult<EnqueueOutcome> {
        let mut state = self.lock()?;
        loop {
            if state.closed {
                return Err(QueueError::Closed);
            }
            if state.registry.is_empty() {
                state.counters.discarded += 1;
                log::warn!(
                    "queue '{}': no subscribers, message discarded",
                    self.queue_id
                );
                self.publish_event(QueueEventType::Discarded, Some(1), None);
                return Ok(EnqueueOutcome::Discarded);
            }
            if !state.ring.is_full() {
                break;
            }
            log::trace!("queue '{}' full, producer waiting", self.queue_id);
            state = handle_mutex_poison(self.not_full.wait(state), |message| {
                QueueError::Poisoned { message }
            })?;
        }

        let row = DeliveryRow::pending_for(state.registry.ids())?;
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state
            .ring
            .push_back(Slot::new(sequence, Arc::new(message), row));
        state.counters.enqueued += 1;
        log::trace!(
            "queue '{}': message #{} queued ({}/{})",
            self.queue_id,
            sequence,
            state.ring.len(),
            state.ring.capacity()
        );
        // Every distinct subscriber may be waiting for this message
        self.not_empty.notify_all();
        Ok(EnqueueOutcome::Queued { sequence })
    }

    /// Receive the message at head if it has not been delivered to `subscriber` yet
    ///
    /// Blocks while the buffer is empty. Returns `Ok(None)` when the head
    /// message was already delivered to this subscriber; later messages
    /// become visible once the head is evicted.
    pub fn receive(&self, subscriber: SubscriberId) -> QueueResult<Option<Arc<T>>> {
        self.receive_until(subscriber, None)
    }

    /// Like [`receive`](Self::receive), giving up with `Ok(None)` once
    /// `timeout` elapses with the buffer still empty
    pub fn receive_timeout(
        &self,
        subscriber: SubscriberId,
        timeout: Duration,
    ) -> QueueResult<Option<Arc<T>>> {
        self.receive_until(subscriber, Some(Instant::now() + timeout))
    }

    fn receive_until(
        &self,
        subscriber: SubscriberId,
        deadline: Option<Instant>,
    ) -> QueueResult<Option<Arc<T>>> {
        let mut state = self.lock()?;
        loop {
            if state.closed {
                return Err(QueueError::Closed);
            }
            if !state.registry.contains(subscriber) {
                return Err(QueueError::NotSubscribed { subscriber });
            }
            if !state.ring.is_empty() {
                break;
            }
            state = match deadline {
                None => handle_mutex_poison(self.not_empty.wait(state), |message| {
                    QueueError::Poisoned { message }
                })?,
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Ok(None);
                    }
                    let (guard, _timed_out) = handle_mutex_poison(
                        self.not_empty.wait_timeout(state, deadline - now),
                        |message| QueueError::Poisoned { message },
                    )?;
                    guard
                }
            };
        }

        let Some((sequence, message)) = delivery::deliver_next(&mut state.ring, subscriber) else {
            return Ok(None);
        };
        log::trace!(
            "queue '{}': message #{} delivered to {}",
            self.queue_id,
            sequence,
            subscriber
        );
        let evicted = delivery::evict_delivered(&mut state.ring);
        self.finish_eviction(&mut state, evicted);
        Ok(Some(message))
    }

    /// Number of queued messages not yet delivered to `subscriber`
    pub fn available_count(&self, subscriber: SubscriberId) -> QueueResult<usize> {
        let state = self.lock()?;
        if !state.registry.contains(subscriber) {
            return Err(QueueError::NotSubscribed { subscriber });
        }
        Ok(delivery::pending_count(&state.ring, subscriber))
    }

    /// Change the capacity, dropping the oldest messages that no longer fit
    ///
    /// Returns the number of dropped messages. Dropped messages are lost for
    /// every subscriber regardless of their delivery state.
    pub fn resize(&self, new_capacity: usize) -> QueueResult<usize> {
        if new_capacity == 0 {
            return Err(QueueError::InvalidCapacity {
                capacity: new_capacity,
            });
        }
        let mut state = self.lock()?;
        let old_capacity = state.ring.capacity();
        let dropped = state.ring.resize(new_capacity)?.len();
        if dropped > 0 {
            state.counters.truncated += dropped as u64;
            log::warn!(
                "queue '{}': resize to {} dropped {} queued messages",
                self.queue_id,
                new_capacity,
                dropped
            );
            self.publish_event(QueueEventType::Truncated, Some(dropped), None);
        }
        log::debug!(
            "queue '{}' resized from {} to {}",
            self.queue_id,
            old_capacity,
            new_capacity
        );
        self.publish_event(QueueEventType::Resized, Some(new_capacity), None);
        if !state.ring.is_full() {
            self.not_full.notify_all();
        }
        Ok(dropped)
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> QueueResult<usize> {
        Ok(self.lock()?.registry.len())
    }

    pub fn is_subscribed(&self, subscriber: SubscriberId) -> QueueResult<bool> {
        Ok(self.lock()?.registry.contains(subscriber))
    }

    pub fn capacity(&self) -> QueueResult<usize> {
        Ok(self.lock()?.ring.capacity())
    }

    /// Number of messages currently held in the buffer
    pub fn len(&self) -> QueueResult<usize> {
        Ok(self.lock()?.ring.len())
    }

    pub fn is_empty(&self) -> QueueResult<bool> {
        Ok(self.lock()?.ring.is_empty())
    }

    pub fn stats(&self) -> QueueResult<QueueStats> {
        let state = self.lock()?;
        Ok(QueueStats {
            capacity: state.ring.capacity(),
            queued: state.ring.len(),
            subscribers: state.registry.len(),
            enqueued: state.counters.enqueued,
            discarded: state.counters.discarded,
            evicted: state.counters.evicted,
            truncated: state.counters.truncated,
            removed: state.counters.removed,
        })
    }

    /// Close the queue, waking every blocked producer and receiver
    ///
    /// Blocked and later `enqueue`/`receive` calls fail with
    /// [`QueueError::Closed`]. Closing twice is a no-op.
    pub fn close(&self) -> QueueResult<()> {
        let mut state = self.lock()?;
        if state.closed {
            return Ok(());
        }
        state.closed = true;
        log::debug!(
            "queue '{}' closed with {} messages queued",
            self.queue_id,
            state.ring.len()
        );
        self.publish_event(QueueEventType::Closed, Some(state.ring.len()), None);
        self.not_full.notify_all();
        self.not_empty.notify_all();
        Ok(())
    }

    pub fn is_closed(&self) -> QueueResult<bool> {
        Ok(self.lock()?.closed)
    }
}

impl<T: PartialEq> BroadcastQueue<T> {
    /// Remove the oldest queued message equal to `message`
    ///
    /// The message is removed whatever its delivery state; the remaining
    /// messages keep their order. Returns whether a message was removed.
    pub fn remove_message(&self, message: &T) -> QueueResult<bool> {
        let mut state = self.lock()?;
        let Some(offset) = state
            .ring
            .iter()
            .position(|slot| slot.message.as_ref() == message)
        else {
            return Ok(false);
        };
        if let Some(slot) = state.ring.remove_at(offset) {
            state.counters.removed += 1;
            log::debug!(
                "queue '{}': message #{} removed",
                self.queue_id,
                slot.sequence
            );
            self.publish_event(QueueEventType::Removed, Some(1), None);
        }
        let evicted = delivery::evict_delivered(&mut state.ring);
        self.finish_eviction(&mut state, evicted);
        self.not_full.notify_all();
        Ok(true)
    }
}
