//! Bounded Broadcast Queue Component
//!
//! An in-process publish/subscribe queue: any number of producer threads
//! enqueue into a bounded buffer and every subscriber receives each message
//! that was enqueued while it was subscribed, exactly once, in enqueue order.
//!
//! # Overview
//!
//! - **Backpressure**: `enqueue` blocks while the buffer is full
//! - **Delivery rows**: each queued message records, per subscriber identity,
//!   whether it has been delivered
//! - **Eviction**: a message leaves the buffer once every subscriber has
//!   received it or unsubscribed
//! - **Head-only receive**: `receive` only looks at the message at head and
//!   returns `None` when that one was already delivered to the caller
//! - **No backlog**: a subscriber joining late never sees messages that were
//!   already queued
//! - **Resizing**: capacity can change at runtime; shrinking below the number
//!   of queued messages drops the oldest ones
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐  ┌────────────┐
//! │ Producer A │  │ Producer B │        enqueue (waits on "not full")
//! └─────┬──────┘  └─────┬──────┘
//!       ▼               ▼
//! ┌───────────────────────────────────────────────────────┐
//! │ BroadcastQueue   (one Mutex, Condvars not_full/empty) │
//! │  ┌─────────────────────────────────────────────────┐  │
//! │  │ RingBuffer   head ─► [m1][m2][m3][  ] ◄─ tail    │  │
//! │  │              rows:   {A✓ B·}{A· B·}{A· B·}       │  │
//! │  └─────────────────────────────────────────────────┘  │
//! │  SubscriberRegistry: {A, B}                           │
//! └───────────────────────────────────────────────────────┘
//!       ▲               ▲
//!       │ receive(A)    │ receive(B)      (waits on "not empty")
//! ┌─────┴──────┐  ┌─────┴──────┐
//! │ Consumer A │  │ Consumer B │
//! └────────────┘  └────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use pubqueue::queue::api::BroadcastQueue;
//! use std::sync::Arc;
//! use std::thread;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let queue = Arc::new(BroadcastQueue::new(2)?);
//! let subscription = queue.subscription("reader")?;
//! let publisher = queue.publisher("writer");
//!
//! let producer = thread::spawn(move || {
//!     for i in 0..5 {
//!         publisher.publish(format!("m{i}")).unwrap();
//!     }
//! });
//!
//! for i in 0..5 {
//!     let message = subscription.receive()?.expect("single subscriber always gets the head");
//!     assert_eq!(*message, format!("m{i}"));
//! }
//! producer.join().unwrap();
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub(crate) mod config;
pub(crate) mod delivery;
pub(crate) mod error;
pub(crate) mod internal;
pub(crate) mod publisher;
pub(crate) mod registry;
pub(crate) mod ring;
pub(crate) mod subscription;
pub(crate) mod types;

// Public API module - the only public interface for the queue system
pub mod api;

#[cfg(test)]
mod tests;
