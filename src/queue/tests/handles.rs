//! Tests for publisher and subscription handles

#[cfg(test)]
mod tests {
    use crate::queue::api::{BroadcastQueue, EnqueueOutcome, QueueError};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_handles_carry_names() {
        let queue = Arc::new(BroadcastQueue::<u32>::new(2).unwrap());
        let publisher = queue.publisher("producer-1");
        let subscription = queue.subscription("reader-1").unwrap();

        assert_eq!(publisher.producer_id(), "producer-1");
        assert_eq!(subscription.name(), "reader-1");
        assert!(queue.is_subscribed(subscription.subscriber_id()).unwrap());
    }

    #[test]
    fn test_subscription_unsubscribes_on_drop() {
        let queue = Arc::new(BroadcastQueue::new(2).unwrap());
        let keeper = queue.subscription("keeper").unwrap();
        let leaver = queue.subscription("leaver").unwrap();
        let publisher = queue.publisher("producer");

        publisher.publish(1_u32).unwrap();
        assert_eq!(keeper.available().unwrap(), 1);
        assert_eq!(leaver.available().unwrap(), 1);

        drop(leaver);
        assert_eq!(queue.subscriber_count().unwrap(), 1);
        assert_eq!(*keeper.receive().unwrap().unwrap(), 1);
        assert!(queue.is_empty().unwrap());
    }

    #[test]
    fn test_receive_batch_stops_at_available() {
        let queue = Arc::new(BroadcastQueue::new(4).unwrap());
        let subscription = queue.subscription("batch").unwrap();
        for i in 0..3_u32 {
            queue.enqueue(i).unwrap();
        }

        let batch = subscription.receive_batch(2).unwrap();
        assert_eq!(batch.len(), 2);
        let rest = subscription.receive_batch(10).unwrap();
        assert_eq!(rest.iter().map(|m| **m).collect::<Vec<_>>(), vec![2]);
        assert!(subscription.receive_batch(10).unwrap().is_empty());
    }

    #[test]
    fn test_receive_batch_ends_at_head_held_by_other_subscriber() {
        let queue = Arc::new(BroadcastQueue::new(4).unwrap());
        let fast = queue.subscription("fast").unwrap();
        let slow = queue.subscription("slow").unwrap();
        for i in 0..3_u32 {
            queue.enqueue(i).unwrap();
        }

        let batch = fast.receive_batch(10).unwrap();
        assert_eq!(batch.iter().map(|m| **m).collect::<Vec<_>>(), vec![0]);
        assert_eq!(fast.available().unwrap(), 2);

        assert_eq!(*slow.receive().unwrap().unwrap(), 0);
        let batch = fast.receive_batch(10).unwrap();
        assert_eq!(batch.iter().map(|m| **m).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_handles_fail_after_queue_dropped() {
        let queue = Arc::new(BroadcastQueue::<u32>::new(2).unwrap());
        let subscription = queue.subscription("orphan").unwrap();
        let publisher = queue.publisher("orphan-producer");
        drop(queue);

        assert!(matches!(publisher.publish(1), Err(QueueError::Closed)));
        assert!(matches!(subscription.receive(), Err(QueueError::Closed)));
        assert!(matches!(subscription.available(), Err(QueueError::Closed)));
    }

    #[test]
    fn test_publisher_without_subscribers_reports_discard() {
        let queue = Arc::new(BroadcastQueue::new(2).unwrap());
        let publisher = queue.publisher("lonely");
        assert_eq!(publisher.publish(1_u32).unwrap(), EnqueueOutcome::Discarded);
    }

    #[test]
    fn test_cloned_publishers_share_the_queue() {
        let queue = Arc::new(BroadcastQueue::new(8).unwrap());
        let subscription = queue.subscription("reader").unwrap();
        let publisher = queue.publisher("shared");

        let workers: Vec<_> = (0..4_u32)
            .map(|worker| {
                let publisher = publisher.clone();
                thread::spawn(move || publisher.publish(worker).unwrap())
            })
            .collect();
        for worker in workers {
            assert!(worker.join().unwrap().is_queued());
        }

        let mut received: Vec<u32> = (0..4)
            .map(|_| {
                *subscription
                    .receive_timeout(Duration::from_secs(5))
                    .unwrap()
                    .unwrap()
            })
            .collect();
        received.sort_unstable();
        assert_eq!(received, vec![0, 1, 2, 3]);
    }
}
