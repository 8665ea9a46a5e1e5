//! Demo workload
//!
//! Runs producer and subscriber threads against one [`BroadcastQueue`] as
//! described by a [`DemoConfig`]. All subscriptions are made before any
//! thread starts, so each subscriber sees the producers' messages from the
//! first one on. A subscriber leaves the queue when its thread finishes;
//! messages published after the last one has left are discarded.

use crate::app::cli::api::{DemoConfig, ProducerConfig, SubscriberConfig};
use crate::app::error::{AppError, AppResult};
use crate::queue::api::{
    BroadcastQueue, EnqueueOutcome, QueuePublisher, QueueResult, QueueStats, Subscription,
};
use colored::Colorize;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProducerReport {
    pub name: String,
    pub queued: usize,
    pub discarded: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriberReport {
    pub name: String,
    pub received: Vec<String>,
}

/// Outcome of a completed demo run
#[derive(Debug, Clone, Default)]
pub struct DemoReport {
    pub producers: Vec<ProducerReport>,
    pub subscribers: Vec<SubscriberReport>,
    pub stats: QueueStats,
}

impl DemoReport {
    pub fn produced(&self) -> usize {
        self.producers.iter().map(|p| p.queued + p.discarded).sum()
    }
}

pub fn run_demo(config: &DemoConfig) -> AppResult<DemoReport> {
    let queue = Arc::new(BroadcastQueue::<String>::with_config(&config.queue)?);
    let mut events = queue.events();
    println!("Queue created with size {}", queue.capacity()?);

    let timeout = Duration::from_millis(config.receive_timeout_ms);
    let mut subscriber_handles = Vec::with_capacity(config.subscribers.len());
    let mut producer_handles = Vec::with_capacity(config.producers.len());

    let spawned = (|| -> AppResult<()> {
        let mut subscriptions = Vec::with_capacity(config.subscribers.len());
        for subscriber in &config.subscribers {
            subscriptions.push((subscriber.clone(), queue.subscription(&subscriber.name)?));
            println!("{}: Subscribed", subscriber.name.green());
        }
        for (subscriber, subscription) in subscriptions {
            let name = subscriber.name.clone();
            let handle = spawn(&name, move || run_subscriber(subscription, &subscriber, timeout))?;
            subscriber_handles.push((name, handle));
        }
        for producer in &config.producers {
            let publisher = queue.publisher(&producer.name);
            let producer = producer.clone();
            let name = producer.name.clone();
            let handle = spawn(&name, move || run_producer(publisher, &producer))?;
            producer_handles.push((name, handle));
        }
        Ok(())
    })();

    if let Err(e) = spawned {
        // Unblock whatever did start before reporting the failure
        queue.close()?;
        for (name, handle) in subscriber_handles {
            join_after_failure(&name, handle);
        }
        for (name, handle) in producer_handles {
            join_after_failure(&name, handle);
        }
        return Err(e);
    }

    let mut report = DemoReport::default();
    for (name, handle) in producer_handles {
        report.producers.push(join(&name, handle)?);
    }
    for (name, handle) in subscriber_handles {
        report.subscribers.push(join(&name, handle)?);
    }

    report.stats = queue.stats()?;
    queue.close()?;
    while let Ok(event) = events.try_recv() {
        log::debug!(
            "event {:?} size={:?} subscriber={:?}",
            event.event_type,
            event.size,
            event.subscriber
        );
    }
    Ok(report)
}

fn spawn<R, F>(name: &str, work: F) -> AppResult<JoinHandle<QueueResult<R>>>
where
    F: FnOnce() -> QueueResult<R> + Send + 'static,
    R: Send + 'static,
{
    thread::Builder::new()
        .name(name.to_string())
        .spawn(work)
        .map_err(|source| AppError::Spawn {
            name: name.to_string(),
            source,
        })
}

fn join<R>(name: &str, handle: JoinHandle<QueueResult<R>>) -> AppResult<R> {
    let result = handle.join().map_err(|_| AppError::WorkerPanicked {
        name: name.to_string(),
    })?;
    Ok(result?)
}

// The startup error takes precedence; worker outcomes are only logged
fn join_after_failure<R>(name: &str, handle: JoinHandle<QueueResult<R>>) -> bool {
    match join(name, handle) {
        Ok(_) => true,
        Err(join_err) => {
            log::warn!(
                "worker '{}' ended with error after startup failure: {}",
                name,
                join_err
            );
            false
        }
    }
}

fn pause(interval_ms: u64) {
    if interval_ms > 0 {
        thread::sleep(Duration::from_millis(interval_ms));
    }
}

fn run_producer(
    publisher: QueuePublisher<String>,
    config: &ProducerConfig,
) -> QueueResult<ProducerReport> {
    let mut report = ProducerReport {
        name: config.name.clone(),
        ..ProducerReport::default()
    };
    for counter in 1..=config.messages {
        pause(config.interval_ms);
        let message = format!("{}{}", config.prefix, counter);
        match publisher.publish(message.clone())? {
            EnqueueOutcome::Queued { sequence } => {
                report.queued += 1;
                println!("{}: Put message '{}'", config.name.cyan(), message);
                log::debug!("{} queued '{}' as #{}", config.name, message, sequence);
            }
            EnqueueOutcome::Discarded => {
                report.discarded += 1;
                println!(
                    "{}: Message '{}' discarded, nobody is subscribed",
                    config.name.cyan(),
                    message.yellow()
                );
            }
        }
    }
    Ok(report)
}

fn run_subscriber(
    subscription: Subscription<String>,
    config: &SubscriberConfig,
    timeout: Duration,
) -> QueueResult<SubscriberReport> {
    let mut report = SubscriberReport {
        name: config.name.clone(),
        received: Vec::with_capacity(config.receive),
    };
    for _ in 0..config.receive {
        match subscription.receive_timeout(timeout)? {
            Some(message) => {
                println!("{}: Received message: {}", config.name.green(), message);
                report.received.push(message.to_string());
            }
            None => log::debug!("{}: nothing new to receive", config.name),
        }
        pause(config.interval_ms);
    }
    drop(subscription);
    println!("{}: Unsubscribed", config.name.green());
    Ok(report)
}
