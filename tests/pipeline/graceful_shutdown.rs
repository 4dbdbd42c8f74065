//! Graceful shutdown through the public API

use drainpipe::pipeline::api::{Pipeline, PipelineConfig, PipelinePhase};
use drainpipe::queue::api::BoundedQueue;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_stop_mid_run_delivers_every_buffered_item() {
    let config = PipelineConfig::new(5, 8, 2, 9)
        .with_think_time(Duration::from_millis(2))
        .with_processing_time(Duration::from_millis(1))
        .with_stop_after(None);
    let pipeline = Arc::new(Pipeline::new(config).unwrap());
    pipeline.start().unwrap();

    tokio::time::sleep(Duration::from_millis(10)).await;
    let stopper = {
        let pipeline = Arc::clone(&pipeline);
        tokio::spawn(async move { pipeline.stop_now().await })
    };
    let report = timeout(Duration::from_secs(5), pipeline.stop())
        .await
        .expect("stop should terminate")
        .unwrap();
    let other = stopper.await.unwrap().unwrap();

    assert_eq!(report, other);
    assert_eq!(pipeline.phase(), PipelinePhase::Stopped);
    assert_eq!(report.total_processed(), report.total_delivered());
    assert_eq!(report.delivered_by_producer().len(), 8);
    assert!(report.queue.high_watermark <= 5);
    assert!(report.is_clean());
}

#[tokio::test]
async fn test_late_consumer_sees_end_of_stream() {
    let queue = Arc::new(BoundedQueue::new(2).unwrap());
    queue.enqueue(1u32).await.unwrap();
    queue.close();

    assert_eq!(queue.dequeue().await, Ok(1));
    assert!(queue.dequeue().await.is_err());
    assert!(queue.enqueue(2).await.is_err());
}
