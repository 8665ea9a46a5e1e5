//! Tests for queue lifecycle: close, drop and event notifications

#[cfg(test)]
mod tests {
    use crate::notifications::api::{QueueEventReceiver, QueueEventType};
    use crate::queue::api::{BroadcastQueue, QueueConfig, QueueError};
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn drain_event_types(events: &mut QueueEventReceiver) -> Vec<QueueEventType> {
        let mut types = Vec::new();
        while let Ok(event) = events.try_recv() {
            types.push(event.event_type);
        }
        types
    }

    #[test]
    fn test_close_wakes_blocked_producer() {
        let queue = Arc::new(BroadcastQueue::new(1).unwrap());
        let id = queue.new_subscriber_id();
        queue.subscribe(id).unwrap();
        queue.enqueue(1).unwrap();

        let (done_tx, done_rx) = mpsc::channel();
        let producer_queue = Arc::clone(&queue);
        let producer = thread::spawn(move || {
            done_tx.send(producer_queue.enqueue(2)).unwrap();
        });

        assert!(done_rx.recv_timeout(Duration::from_millis(100)).is_err());
        queue.close().unwrap();

        let result = done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(result, Err(QueueError::Closed)));
        producer.join().unwrap();
    }

    #[test]
    fn test_close_wakes_blocked_receiver() {
        let queue = Arc::new(BroadcastQueue::<u32>::new(1).unwrap());
        let id = queue.new_subscriber_id();
        queue.subscribe(id).unwrap();

        let receiver_queue = Arc::clone(&queue);
        let receiver = thread::spawn(move || receiver_queue.receive(id));

        thread::sleep(Duration::from_millis(50));
        queue.close().unwrap();
        assert!(matches!(receiver.join().unwrap(), Err(QueueError::Closed)));
    }

    #[test]
    fn test_close_is_idempotent_and_rejects_new_work() {
        let queue = BroadcastQueue::new(2).unwrap();
        let id = queue.new_subscriber_id();
        queue.subscribe(id).unwrap();

        queue.close().unwrap();
        queue.close().unwrap();

        assert!(queue.is_closed().unwrap());
        assert!(matches!(queue.enqueue(1), Err(QueueError::Closed)));
        assert!(matches!(queue.receive(id), Err(QueueError::Closed)));
        // Bookkeeping calls stay available after close
        assert!(queue.unsubscribe(id).unwrap());
    }

    #[test]
    fn test_drop_releases_queued_messages() {
        let payload = Arc::new("shared".to_string());
        let queue = BroadcastQueue::new(2).unwrap();
        let id = queue.new_subscriber_id();
        queue.subscribe(id).unwrap();
        queue.enqueue(Arc::clone(&payload)).unwrap();
        assert_eq!(Arc::strong_count(&payload), 2);

        drop(queue);
        assert_eq!(Arc::strong_count(&payload), 1);
    }

    #[test]
    fn test_events_follow_message_lifecycle() {
        let queue = BroadcastQueue::with_config(&QueueConfig {
            queue_id: "events".to_string(),
            ..QueueConfig::with_capacity(2)
        })
        .unwrap();
        let mut events = queue.events();

        queue.enqueue(0).unwrap();
        let id = queue.new_subscriber_id();
        queue.subscribe(id).unwrap();
        queue.enqueue(1).unwrap();
        queue.enqueue(2).unwrap();
        queue.receive(id).unwrap();
        queue.resize(1).unwrap();
        queue.unsubscribe(id).unwrap();
        queue.close().unwrap();

        assert_eq!(
            drain_event_types(&mut events),
            vec![
                QueueEventType::Discarded,
                QueueEventType::Subscribed,
                QueueEventType::Evicted,
                QueueEventType::Resized,
                QueueEventType::Evicted,
                QueueEventType::Unsubscribed,
                QueueEventType::Closed,
            ]
        );
    }

    #[test]
    fn test_truncation_event_reports_dropped_count() {
        let queue = BroadcastQueue::new(3).unwrap();
        let id = queue.new_subscriber_id();
        queue.subscribe(id).unwrap();
        for message in [1, 2, 3] {
            queue.enqueue(message).unwrap();
        }
        let mut events = queue.events();

        queue.resize(1).unwrap();

        let truncated = events.try_recv().unwrap();
        assert_eq!(truncated.event_type, QueueEventType::Truncated);
        assert_eq!(truncated.size, Some(2));
        assert_eq!(truncated.queue_id, "global");
        let resized = events.try_recv().unwrap();
        assert_eq!(resized.event_type, QueueEventType::Resized);
        assert_eq!(resized.size, Some(1));
    }
}
