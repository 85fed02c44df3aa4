//! Multiple producers and a waiting consumer

#[cfg(test)]
mod tests {
    use crate::queue::api::{QueueError, SequencedQueue};
    use tokio::task::JoinSet;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn test_concurrent_producers_interleave_without_gaps() {
        let queue = SequencedQueue::new();
        let mut producers = JoinSet::new();

        for producer_id in 0..4u32 {
            let producer = queue.producer();
            producers.spawn(async move {
                for i in 0..100u32 {
                    producer.push((producer_id, i)).await.unwrap();
                }
            });
        }
        while let Some(result) = producers.join_next().await {
            result.unwrap();
        }
        queue.dispose().await.unwrap();

        let mut consumer = queue.consumer();
        let mut seqs = Vec::new();
        let mut last_per_producer = [None::<u32>; 4];
        while let Some(entry) = consumer.next().await.unwrap() {
            let (producer_id, i) = *entry.value();
            // Each producer's own order is preserved
            if let Some(previous) = last_per_producer[producer_id as usize] {
                assert!(i > previous);
            }
            last_per_producer[producer_id as usize] = Some(i);
            seqs.push(entry.seq());
            consumer.confirm(&entry);
        }

        assert_eq!(seqs, (0..400).collect::<Vec<u64>>());
        println!("✓ 400 entries from 4 producers delivered gap-free");
    }

    #[tokio::test]
    async fn test_waiting_consumer_receives_later_push() {
        let queue = SequencedQueue::new();
        let waiter = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.peek().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        queue.push("late").await.unwrap();

        let entry = timeout(Duration::from_millis(500), waiter)
            .await
            .expect("consumer should be woken by push")
            .unwrap()
            .unwrap()
            .expect("entry");
        assert_eq!((entry.seq(), *entry.value()), (0, "late"));
    }

    #[tokio::test]
    async fn test_second_waiting_fetch_supersedes_first() {
        let queue: SequencedQueue<i32> = SequencedQueue::new();
        let first = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.peek().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let second = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.peek().await })
        };

        let first_result = timeout(Duration::from_millis(500), first)
            .await
            .expect("first fetch should be answered")
            .unwrap();
        assert_eq!(first_result, Err(QueueError::Superseded));

        queue.push(3).await.unwrap();
        let entry = timeout(Duration::from_millis(500), second)
            .await
            .expect("second fetch should be answered")
            .unwrap()
            .unwrap()
            .expect("entry");
        assert_eq!(*entry.value(), 3);
    }

    #[tokio::test]
    async fn test_consumer_and_producers_run_together() {
        let queue = SequencedQueue::new();

        let consumer_task = {
            let mut consumer = queue.consumer();
            tokio::spawn(async move {
                let mut received = Vec::new();
                while let Some(entry) = consumer.next().await.unwrap() {
                    received.push(*entry.value());
                    consumer.confirm(&entry);
                }
                received
            })
        };

        let mut producers = JoinSet::new();
        for base in [0u32, 1000] {
            let producer = queue.producer();
            producers.spawn(async move {
                for i in 0..50 {
                    producer.push(base + i).await.unwrap();
                    tokio::task::yield_now().await;
                }
            });
        }
        while let Some(result) = producers.join_next().await {
            result.unwrap();
        }
        queue.dispose().await.unwrap();

        let mut received = timeout(Duration::from_secs(5), consumer_task)
            .await
            .expect("consumer should finish after drain")
            .unwrap();
        received.sort_unstable();
        let mut expected: Vec<u32> = (0..50).chain(1000..1050).collect();
        expected.sort_unstable();
        assert_eq!(received, expected);
    }
}
