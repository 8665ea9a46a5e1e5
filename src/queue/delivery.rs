//! Delivery tracking
//!
//! Every queued message carries a [`DeliveryRow`]: one flag per subscriber
//! that is relevant to the message, keyed by [`SubscriberId`]. Flags only
//! ever move from pending to delivered. A message may leave the ring buffer
//! once every flag in its row is delivered; the functions in this module
//! apply subscriber actions to the rows of a [`RingBuffer`] and evict
//! whatever became fully delivered at the head.

use crate::queue::error::{QueueError, QueueResult};
use crate::queue::registry::SubscriberId;
use crate::queue::ring::{RingBuffer, Slot};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DeliveryFlag {
    subscriber: SubscriberId,
    delivered: bool,
}

/// Per-message delivery record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DeliveryRow {
    flags: Vec<DeliveryFlag>,
}

/// Result of marking a row for one subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mark {
    /// The flag moved from pending to delivered
    Delivered,
    /// The flag was already delivered, or the subscriber is not part of the row
    AlreadyDelivered,
}

impl DeliveryRow {
    /// Row with one pending flag per subscriber
    pub(crate) fn pending_for(subscribers: &[SubscriberId]) -> QueueResult<Self> {
        let mut flags = Vec::new();
        flags
            .try_reserve_exact(subscribers.len())
            .map_err(|_| QueueError::allocation("delivery row"))?;
        flags.extend(subscribers.iter().map(|&subscriber| DeliveryFlag {
            subscriber,
            delivered: false,
        }));
        Ok(Self { flags })
    }

    fn flag_mut(&mut self, subscriber: SubscriberId) -> Option<&mut DeliveryFlag> {
        self.flags
            .iter_mut()
            .find(|flag| flag.subscriber == subscriber)
    }

    /// Add an already-delivered flag for a subscriber that joined late.
    /// An existing flag is left as it is.
    pub(crate) fn extend(&mut self, subscriber: SubscriberId) -> QueueResult<()> {
        if self.flag_mut(subscriber).is_some() {
            return Ok(());
        }
        self.flags
            .try_reserve(1)
            .map_err(|_| QueueError::allocation("delivery row"))?;
        self.flags.push(DeliveryFlag {
            subscriber,
            delivered: true,
        });
        Ok(())
    }

    pub(crate) fn mark(&mut self, subscriber: SubscriberId) -> Mark {
        match self.flag_mut(subscriber) {
            Some(flag) if !flag.delivered => {
                flag.delivered = true;
                Mark::Delivered
            }
            _ => Mark::AlreadyDelivered,
        }
    }

    pub(crate) fn is_pending_for(&self, subscriber: SubscriberId) -> bool {
        self.flags
            .iter()
            .any(|flag| flag.subscriber == subscriber && !flag.delivered)
    }

    pub(crate) fn is_fully_delivered(&self) -> bool {
        self.flags.iter().all(|flag| flag.delivered)
    }

    pub(crate) fn len(&self) -> usize {
        self.flags.len()
    }
}

/// Deliver the message at head to `subscriber` if its flag there is still
/// pending.
///
/// Only the head is considered: a subscriber that already has the head
/// message gets `None` until that message is evicted, even when later
/// messages are pending for it. Never moves the head; eviction happens
/// separately through [`evict_delivered`].
pub(crate) fn deliver_next<T>(
    ring: &mut RingBuffer<T>,
    subscriber: SubscriberId,
) -> Option<(u64, Arc<T>)> {
    let slot = ring.front_mut()?;
    match slot.row.mark(subscriber) {
        Mark::Delivered => Some((slot.sequence, Arc::clone(&slot.message))),
        Mark::AlreadyDelivered => None,
    }
}

/// Extend every pending row for a newly joined subscriber
pub(crate) fn extend_rows<T>(ring: &mut RingBuffer<T>, subscriber: SubscriberId) -> QueueResult<()> {
    for slot in ring.iter_mut() {
        slot.row.extend(subscriber)?;
    }
    Ok(())
}

/// Force `subscriber` to delivered on every pending row
pub(crate) fn force_deliver<T>(ring: &mut RingBuffer<T>, subscriber: SubscriberId) -> usize {
    ring.iter_mut()
        .map(|slot| slot.row.mark(subscriber))
        .filter(|mark| *mark == Mark::Delivered)
        .count()
}

/// Pop fully delivered slots off the head, oldest first
pub(crate) fn evict_delivered<T>(ring: &mut RingBuffer<T>) -> Vec<Slot<T>> {
    let mut evicted = Vec::new();
    while ring
        .front()
        .is_some_and(|slot| slot.row.is_fully_delivered())
    {
        if let Some(slot) = ring.pop_front() {
            log::trace!("evicting message #{} ({} flags)", slot.sequence, slot.row.len());
            evicted.push(slot);
        }
    }
    evicted
}

/// Number of queued messages still pending for `subscriber`
pub(crate) fn pending_count<T>(ring: &RingBuffer<T>, subscriber: SubscriberId) -> usize {
    ring.iter()
        .filter(|slot| slot.row.is_pending_for(subscriber))
        .count()
}
