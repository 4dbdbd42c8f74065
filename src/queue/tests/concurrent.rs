//! Tests for concurrent queue operations under contention

#[cfg(test)]
mod tests {
    use crate::queue::api::BoundedQueue;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::task::JoinSet;
    use tokio::time::{timeout, Duration};

    async fn drain(queue: Arc<BoundedQueue<(usize, usize)>>) -> Vec<(usize, usize)> {
        let mut received = Vec::new();
        while let Ok(item) = queue.dequeue().await {
            received.push(item);
            tokio::task::yield_now().await;
        }
        received
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_many_producers_many_consumers_no_loss_no_duplicates() {
        let producer_count = 4;
        let items_per_producer = 200;
        let queue = Arc::new(BoundedQueue::new(3).unwrap());

        let mut producers = JoinSet::new();
        for producer_id in 0..producer_count {
            let queue = Arc::clone(&queue);
            producers.spawn(async move {
                for sequence in 0..items_per_producer {
                    queue.enqueue((producer_id, sequence)).await.unwrap();
                }
            });
        }

        let mut consumers = JoinSet::new();
        for _ in 0..3 {
            consumers.spawn(drain(Arc::clone(&queue)));
        }

        while let Some(result) = producers.join_next().await {
            result.unwrap();
        }
        queue.close();

        let mut all = Vec::new();
        while let Some(result) = timeout(Duration::from_secs(5), consumers.join_next())
            .await
            .expect("consumers should finish once the queue is closed and empty")
        {
            let received = result.unwrap();

            // Each consumer sees every producer's items in increasing order
            let mut last_seen: HashMap<usize, usize> = HashMap::new();
            for &(producer_id, sequence) in &received {
                if let Some(&previous) = last_seen.get(&producer_id) {
                    assert!(sequence > previous, "per-producer order violated");
                }
                last_seen.insert(producer_id, sequence);
            }
            all.extend(received);
        }

        let unique: HashSet<_> = all.iter().copied().collect();
        assert_eq!(all.len(), producer_count * items_per_producer);
        assert_eq!(unique.len(), all.len(), "no item may be duplicated");

        let stats = queue.stats();
        assert!(stats.high_watermark <= 3);
        assert_eq!(stats.enqueued_total, (producer_count * items_per_producer) as u64);
        assert_eq!(stats.dequeued_total, stats.enqueued_total);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_capacity_bound_holds_at_every_sample() {
        let capacity = 4;
        let queue = Arc::new(BoundedQueue::new(capacity).unwrap());
        let done = Arc::new(AtomicBool::new(false));

        let sampler = {
            let queue = Arc::clone(&queue);
            let done = Arc::clone(&done);
            tokio::spawn(async move {
                let mut samples = 0usize;
                while !done.load(Ordering::Acquire) {
                    let stats = queue.stats();
                    assert!(stats.buffered <= capacity, "capacity exceeded: {:?}", stats);
                    assert_eq!(stats.dequeued_total + stats.buffered as u64, stats.enqueued_total);
                    samples += 1;
                    tokio::task::yield_now().await;
                }
                samples
            })
        };

        let mut producers = JoinSet::new();
        for producer_id in 0..6 {
            let queue = Arc::clone(&queue);
            producers.spawn(async move {
                for sequence in 0..100 {
                    queue.enqueue((producer_id, sequence)).await.unwrap();
                }
            });
        }
        let consumer = tokio::spawn(drain(Arc::clone(&queue)));

        while let Some(result) = producers.join_next().await {
            result.unwrap();
        }
        queue.close();
        let received = consumer.await.unwrap();
        done.store(true, Ordering::Release);

        assert_eq!(received.len(), 600);
        assert!(sampler.await.unwrap() > 0);
        assert!(queue.stats().high_watermark <= capacity);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_close_transitions_once() {
        let queue = Arc::new(BoundedQueue::<u8>::new(2).unwrap());
        let mut closers = JoinSet::new();
        for _ in 0..16 {
            let queue = Arc::clone(&queue);
            closers.spawn(async move { queue.close() });
        }

        let mut transitions = 0;
        while let Some(result) = closers.join_next().await {
            if result.unwrap() {
                transitions += 1;
            }
        }
        assert_eq!(transitions, 1);
        assert!(queue.is_closed());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_close_during_production_loses_nothing() {
        let queue = Arc::new(BoundedQueue::new(2).unwrap());

        let mut producers = JoinSet::new();
        for producer_id in 0..5 {
            let queue = Arc::clone(&queue);
            producers.spawn(async move {
                let mut delivered = 0usize;
                for sequence in 0..1_000 {
                    if queue.enqueue((producer_id, sequence)).await.is_err() {
                        break;
                    }
                    delivered += 1;
                }
                delivered
            });
        }

        let mut consumers = JoinSet::new();
        for _ in 0..2 {
            consumers.spawn(drain(Arc::clone(&queue)));
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.close();

        let mut delivered = 0;
        while let Some(result) = timeout(Duration::from_secs(5), producers.join_next())
            .await
            .expect("producers should stop once the queue is closed")
        {
            delivered += result.unwrap();
        }

        let mut processed = 0;
        while let Some(result) = timeout(Duration::from_secs(5), consumers.join_next())
            .await
            .expect("consumers should drain and stop")
        {
            processed += result.unwrap().len();
        }

        assert_eq!(processed, delivered);
        assert_eq!(queue.stats().enqueued_total, delivered as u64);
    }
}
