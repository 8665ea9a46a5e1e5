//! Type definitions for the queue system
//!
//! Outcome and statistics types returned by [`BroadcastQueue`](crate::queue::api::BroadcastQueue).

/// Result of a successful enqueue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// Stored in the buffer with the given sequence number
    Queued { sequence: u64 },
    /// Dropped without being stored because there were no subscribers
    Discarded,
}

impl EnqueueOutcome {
    pub fn is_queued(&self) -> bool {
        matches!(self, EnqueueOutcome::Queued { .. })
    }

    pub fn sequence(&self) -> Option<u64> {
        match self {
            EnqueueOutcome::Queued { sequence } => Some(*sequence),
            EnqueueOutcome::Discarded => None,
        }
    }
}

/// Point-in-time statistics for a queue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Current capacity in messages
    pub capacity: usize,
    /// Messages currently held in the buffer
    pub queued: usize,
    /// Registered subscribers
    pub subscribers: usize,
    /// Messages stored since creation
    pub enqueued: u64,
    /// Messages dropped on enqueue for lack of subscribers
    pub discarded: u64,
    /// Messages evicted after full delivery
    pub evicted: u64,
    /// Messages dropped by shrinking resizes
    pub truncated: u64,
    /// Messages removed through `remove_message`
    pub removed: u64,
}
