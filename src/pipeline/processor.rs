//! Item processing seam
//!
//! Consumers delegate the actual work to an [`ItemProcessor`]. The default
//! [`DelayProcessor`] models consumption latency with a fixed sleep.

use crate::pipeline::item::WorkItem;
use async_trait::async_trait;
use std::time::Duration;

/// Work performed by a consumer on each dequeued item
///
/// Implementations are shared by every consumer of a pipeline. A panic inside
/// `process` takes down only the calling consumer and is reported as a unit
/// failure by the coordinator.
#[async_trait]
pub trait ItemProcessor: Send + Sync {
    async fn process(&self, consumer_id: usize, item: &WorkItem);
}

/// Processor that simply waits for a fixed processing time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayProcessor {
    processing_time: Duration,
}

impl DelayProcessor {
    pub fn new(processing_time: Duration) -> Self {
        Self { processing_time }
    }

    pub fn processing_time(&self) -> Duration {
        self.processing_time
    }
}

#[async_trait]
impl ItemProcessor for DelayProcessor {
    async fn process(&self, _consumer_id: usize, _item: &WorkItem) {
        if !self.processing_time.is_zero() {
            tokio::time::sleep(self.processing_time).await;
        }
    }
}
