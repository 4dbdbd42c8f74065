//! Pipeline configuration
//!
//! Defaults mirror the reference setup: a five-slot buffer shared by eight
//! producers emitting nine items each, two consumers, half a second of think
//! time per item, 200ms of processing, and a stop after five seconds.

use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::queue::QueueError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_CAPACITY: usize = 5;
pub const DEFAULT_PRODUCERS: usize = 8;
pub const DEFAULT_CONSUMERS: usize = 2;
pub const DEFAULT_ITEMS_PER_PRODUCER: usize = 9;
pub const DEFAULT_THINK_TIME_MS: u64 = 500;
pub const DEFAULT_PROCESSING_TIME_MS: u64 = 200;
pub const DEFAULT_STOP_AFTER_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PipelineConfig {
    pub capacity: usize,
    pub producers: usize,
    pub consumers: usize,
    pub items_per_producer: usize,
    pub think_time_ms: u64,
    pub processing_time_ms: u64,
    /// `None` runs until every producer has finished
    pub stop_after_ms: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            producers: DEFAULT_PRODUCERS,
            consumers: DEFAULT_CONSUMERS,
            items_per_producer: DEFAULT_ITEMS_PER_PRODUCER,
            think_time_ms: DEFAULT_THINK_TIME_MS,
            processing_time_ms: DEFAULT_PROCESSING_TIME_MS,
            stop_after_ms: Some(DEFAULT_STOP_AFTER_MS),
        }
    }
}

impl PipelineConfig {
    /// Shape of the pipeline with default pacing
    pub fn new(
        capacity: usize,
        producers: usize,
        consumers: usize,
        items_per_producer: usize,
    ) -> Self {
        Self {
            capacity,
            producers,
            consumers,
            items_per_producer,
            ..Self::default()
        }
    }

    pub fn with_think_time(mut self, think_time: Duration) -> Self {
        self.think_time_ms = duration_to_millis(think_time);
        self
    }

    pub fn with_processing_time(mut self, processing_time: Duration) -> Self {
        self.processing_time_ms = duration_to_millis(processing_time);
        self
    }

    pub fn with_stop_after(mut self, stop_after: Option<Duration>) -> Self {
        self.stop_after_ms = stop_after.map(duration_to_millis);
        self
    }

    pub fn think_time(&self) -> Duration {
        Duration::from_millis(self.think_time_ms)
    }

    pub fn processing_time(&self) -> Duration {
        Duration::from_millis(self.processing_time_ms)
    }

    pub fn stop_after(&self) -> Option<Duration> {
        self.stop_after_ms.map(Duration::from_millis)
    }

    /// Total items the producers will try to emit
    pub fn total_items(&self) -> usize {
        self.producers.saturating_mul(self.items_per_producer)
    }

    /// Reject configurations that can never run correctly
    pub fn validate(&self) -> PipelineResult<()> {
        if self.capacity == 0 {
            return Err(QueueError::InvalidCapacity {
                capacity: self.capacity,
            }
            .into());
        }
        if self.consumers == 0 {
            return Err(PipelineError::InvalidConsumerCount);
        }
        Ok(())
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
