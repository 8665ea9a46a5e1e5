//! Bounded ring buffer of queued message slots
//!
//! Pure storage: head/tail/count bookkeeping over a fixed number of slots.
//! Whether a slot may be evicted is decided by the delivery tracker in
//! [`crate::queue::delivery`]; this module only moves slots around.

use crate::queue::delivery::DeliveryRow;
use crate::queue::error::{QueueError, QueueResult};
use std::sync::Arc;

/// A queued message together with its delivery row
#[derive(Debug)]
pub(crate) struct Slot<T> {
    pub(crate) sequence: u64,
    pub(crate) message: Arc<T>,
    pub(crate) row: DeliveryRow,
}

impl<T> Slot<T> {
    pub(crate) fn new(sequence: u64, message: Arc<T>, row: DeliveryRow) -> Self {
        Self {
            sequence,
            message,
            row,
        }
    }
}

#[derive(Debug)]
pub(crate) struct RingBuffer<T> {
    slots: Vec<Option<Slot<T>>>,
    head: usize,
    tail: usize,
    count: usize,
}

impl<T> RingBuffer<T> {
    /// Allocate `capacity` empty slots; `capacity` must be non-zero
    pub(crate) fn with_capacity(capacity: usize) -> QueueResult<Self> {
        if capacity == 0 {
            return Err(QueueError::InvalidCapacity { capacity });
        }
        Ok(Self {
            slots: allocate_slots(capacity)?,
            head: 0,
            tail: 0,
            count: 0,
        })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.count
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub(crate) fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    /// Physical index of the slot `offset` positions after head
    fn physical(&self, offset: usize) -> usize {
        (self.head + offset) % self.capacity()
    }

    /// Append at tail. The caller must have checked `is_full()`.
    pub(crate) fn push_back(&mut self, slot: Slot<T>) {
        debug_assert!(!self.is_full(), "push_back on a full ring buffer");
        self.slots[self.tail] = Some(slot);
        self.tail = (self.tail + 1) % self.capacity();
        self.count += 1;
    }

    pub(crate) fn front(&self) -> Option<&Slot<T>> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.head].as_ref()
    }

    pub(crate) fn front_mut(&mut self) -> Option<&mut Slot<T>> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.head].as_mut()
    }

    pub(crate) fn pop_front(&mut self) -> Option<Slot<T>> {
        if self.is_empty() {
            return None;
        }
        let slot = self.slots[self.head].take();
        self.head = (self.head + 1) % self.capacity();
        self.count -= 1;
        slot
    }

    /// Queued slots from head to tail
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Slot<T>> + '_ {
        (0..self.count).filter_map(move |offset| self.slots[self.physical(offset)].as_ref())
    }

    /// Queued slots from head to tail, mutably
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Slot<T>> + '_ {
        let capacity = self.capacity();
        let (head, count) = (self.head, self.count);
        // Split the backing storage into the wrapped and unwrapped halves
        let (wrapped, from_head) = self.slots.split_at_mut(head);
        let first_len = count.min(capacity - head);
        let second_len = count - first_len;
        from_head[..first_len]
            .iter_mut()
            .chain(wrapped[..second_len].iter_mut())
            .filter_map(Option::as_mut)
    }

    /// Remove the slot `offset` positions after head, closing the gap
    pub(crate) fn remove_at(&mut self, offset: usize) -> Option<Slot<T>> {
        if offset >= self.count {
            return None;
        }
        let index = self.physical(offset);
        let removed = self.slots[index].take();
        for position in offset..self.count - 1 {
            let from = self.physical(position + 1);
            let to = self.physical(position);
            self.slots[to] = self.slots[from].take();
        }
        self.count -= 1;
        self.tail = self.physical(self.count);
        removed
    }

    /// Reallocate to `new_capacity`, dropping the oldest entries that no
    /// longer fit. Remaining entries keep their order, re-based at index 0.
    ///
    /// Returns the dropped slots, oldest first.
    pub(crate) fn resize(&mut self, new_capacity: usize) -> QueueResult<Vec<Slot<T>>> {
        if new_capacity == 0 {
            return Err(QueueError::InvalidCapacity {
                capacity: new_capacity,
            });
        }
        // Allocate first so a failure leaves the buffer untouched
        let mut slots = allocate_slots(new_capacity)?;

        let overflow = self.count.saturating_sub(new_capacity);
        let mut dropped = Vec::new();
        dropped
            .try_reserve_exact(overflow)
            .map_err(|_| QueueError::allocation("truncated slots"))?;
        for _ in 0..overflow {
            if let Some(slot) = self.pop_front() {
                dropped.push(slot);
            }
        }

        let mut index = 0;
        while let Some(slot) = self.pop_front() {
            slots[index] = Some(slot);
            index += 1;
        }

        self.slots = slots;
        self.head = 0;
        self.count = index;
        self.tail = index % new_capacity;
        Ok(dropped)
    }
}

fn allocate_slots<T>(capacity: usize) -> QueueResult<Vec<Option<Slot<T>>>> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|_| QueueError::allocation("ring buffer slots"))?;
    slots.resize_with(capacity, || None);
    Ok(slots)
}
