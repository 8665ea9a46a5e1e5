//! Public API for queue notifications
//!
//! External modules should import from here rather than directly from internal modules.

pub use crate::notifications::bus::{QueueEventBus, DEFAULT_EVENT_CAPACITY};
pub use crate::notifications::event::{QueueEvent, QueueEventType};

/// Receiving end handed out by [`QueueEventBus::subscribe`]
pub type QueueEventReceiver = tokio::sync::broadcast::Receiver<QueueEvent>;
