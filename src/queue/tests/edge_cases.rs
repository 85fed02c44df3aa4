//! Wraparound, stale acknowledgments and abandoned waits

#[cfg(test)]
mod tests {
    use crate::queue::api::{QueueConfig, QueueState, SequencedQueue};
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn test_sequences_wrap_past_max() {
        let queue = SequencedQueue::with_config(
            QueueConfig::named("wrap").with_initial_sequence(u64::MAX - 1),
        );
        for value in 0..4 {
            queue.push(value).await.unwrap();
        }
        queue.dispose().await.unwrap();

        let mut consumer = queue.consumer();
        let mut seqs = Vec::new();
        while let Some(entry) = consumer.next().await.unwrap() {
            seqs.push(entry.seq());
            consumer.confirm(&entry);
        }

        assert_eq!(seqs, vec![u64::MAX - 1, u64::MAX, 0, 1]);
        assert_eq!(queue.stats().await.unwrap().next_seq, 2);
        println!("✓ Sequence numbers wrap from u64::MAX to 0");
    }

    #[tokio::test]
    async fn test_stale_and_future_acks_are_ignored() {
        let queue = SequencedQueue::new();
        for value in 0..3 {
            queue.push(value).await.unwrap();
        }

        let first = queue.peek().await.unwrap().expect("entry");
        for bogus in [1, 2, 99, u64::MAX] {
            let entry = queue.pull(bogus).await.unwrap().expect("entry");
            assert_eq!(entry, first, "ack {} should not move the queue", bogus);
        }

        let second = queue.pull(first.seq()).await.unwrap().expect("entry");
        // A repeated ack for an already trimmed entry is stale
        let again = queue.pull(first.seq()).await.unwrap().expect("entry");
        assert_eq!(second, again);
        assert_eq!(queue.stats().await.unwrap().buffered, 2);
    }

    #[tokio::test]
    async fn test_abandoned_wait_leaves_head_undelivered() {
        let queue = SequencedQueue::new();

        let abandoned = timeout(Duration::from_millis(30), queue.peek()).await;
        assert!(abandoned.is_err());

        queue.push("kept").await.unwrap();
        let stats = queue.stats().await.unwrap();
        assert_eq!(stats.deliveries, 0);
        assert_eq!(stats.delivered_boundary, 0);

        let entry = queue.peek().await.unwrap().expect("entry");
        assert_eq!(*entry.value(), "kept");
        assert_eq!(queue.stats().await.unwrap().redeliveries, 0);
    }

    #[tokio::test]
    async fn test_unit_payloads() {
        let queue = SequencedQueue::new();
        queue.push(()).await.unwrap();
        queue.push(()).await.unwrap();

        let first = queue.peek().await.unwrap().expect("entry");
        let second = queue.pull(first.seq()).await.unwrap().expect("entry");
        assert_eq!(second.seq(), 1);
    }

    #[tokio::test]
    async fn test_stats_reflect_state_transitions() {
        let queue = SequencedQueue::with_config(QueueConfig::named("stats"));
        assert_eq!(queue.name(), "stats");
        assert_eq!(queue.stats().await.unwrap().state, QueueState::Open);

        queue.push(1u8).await.unwrap();
        queue.dispose().await.unwrap();
        assert_eq!(queue.stats().await.unwrap().state, QueueState::Draining);

        let entry = queue.peek().await.unwrap().expect("entry");
        assert_eq!(queue.pull(entry.seq()).await, Ok(None));
        queue.closed().await;
        assert_eq!(queue.stats().await.unwrap().state, QueueState::Closed);
    }
}
