//! QueueConsumer confirm / redeliver behaviour

#[cfg(test)]
mod tests {
    use crate::queue::api::SequencedQueue;

    #[tokio::test]
    async fn test_next_without_confirm_redelivers() {
        let queue = SequencedQueue::new();
        let mut consumer = queue.consumer();
        queue.push("a").await.unwrap();
        queue.push("b").await.unwrap();

        let first = consumer.next().await.unwrap().expect("entry");
        let again = consumer.next().await.unwrap().expect("entry");
        assert_eq!(first, again);
        assert_eq!(consumer.last_confirmed(), None);

        consumer.confirm(&first);
        let second = consumer.next().await.unwrap().expect("entry");
        assert_eq!(*second.value(), "b");
        assert_eq!(consumer.last_confirmed(), Some(0));
    }

    #[tokio::test]
    async fn test_confirm_every_other_attempt() {
        let queue = SequencedQueue::new();
        let mut consumer = queue.consumer();
        for value in ["x", "y", "z"] {
            queue.push(value).await.unwrap();
        }
        queue.dispose().await.unwrap();

        let mut attempts = 0;
        let mut processed = Vec::new();
        while let Some(entry) = consumer.next().await.unwrap() {
            attempts += 1;
            if attempts % 2 == 1 {
                // Simulated failure: leave unconfirmed
                continue;
            }
            processed.push(*entry.value());
            consumer.confirm(&entry);
        }

        assert_eq!(processed, vec!["x", "y", "z"]);
        let stats = queue.stats().await.unwrap();
        assert_eq!(stats.redeliveries, 3);
        assert_eq!(stats.acknowledged, 3);
        println!("✓ Failed attempts are redelivered until confirmed");
    }
}
