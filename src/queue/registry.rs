//! Subscriber registry
//!
//! Tracks the set of subscriber identities currently attached to a queue.
//! Identities are opaque [`SubscriberId`] values issued by the queue; the
//! registry never looks at threads or positions, so removing one subscriber
//! can never disturb the bookkeeping of another.

use crate::queue::error::{QueueError, QueueResult};
use std::fmt;

/// Opaque subscriber identity issued by a queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value, useful for logging and display only
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscriber-{}", self.0)
    }
}

/// Set of registered subscribers in join order
#[derive(Debug, Default)]
pub(crate) struct SubscriberRegistry {
    members: Vec<SubscriberId>,
}

impl SubscriberRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert `id`; returns false when it was already registered
    pub(crate) fn add(&mut self, id: SubscriberId) -> QueueResult<bool> {
        if self.contains(id) {
            return Ok(false);
        }
        self.members
            .try_reserve(1)
            .map_err(|_| QueueError::allocation("subscriber registry"))?;
        self.members.push(id);
        Ok(true)
    }

    /// Remove `id`; returns false when it was not registered
    ///
    /// The caller is responsible for force-delivering `id` on pending rows.
    pub(crate) fn remove(&mut self, id: SubscriberId) -> bool {
        match self.members.iter().position(|member| *member == id) {
            Some(index) => {
                self.members.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn contains(&self, id: SubscriberId) -> bool {
        self.members.contains(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.members.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn ids(&self) -> &[SubscriberId] {
        &self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let mut registry = SubscriberRegistry::new();
        let id = SubscriberId::from_raw(7);

        assert!(registry.add(id).unwrap());
        assert!(!registry.add(id).unwrap());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(id));
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut registry = SubscriberRegistry::new();
        registry.add(SubscriberId::from_raw(1)).unwrap();

        assert!(!registry.remove(SubscriberId::from_raw(2)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_keeps_other_members_in_join_order() {
        let mut registry = SubscriberRegistry::new();
        let a = SubscriberId::from_raw(1);
        let b = SubscriberId::from_raw(2);
        let c = SubscriberId::from_raw(3);
        registry.add(a).unwrap();
        registry.add(b).unwrap();
        registry.add(c).unwrap();

        assert!(registry.remove(b));
        assert_eq!(registry.ids(), &[a, c]);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_subscriber_id_display() {
        assert_eq!(SubscriberId::from_raw(42).to_string(), "subscriber-42");
        assert_eq!(SubscriberId::from_raw(42).as_u64(), 42);
    }
}
