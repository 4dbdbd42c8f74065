//! Consumer - drains the queue until end-of-stream

use crate::pipeline::item::{CompletionRecord, WorkItem};
use crate::pipeline::processor::ItemProcessor;
use crate::pipeline::state::{ConsumerState, TerminalOnDrop, UnitState};
use crate::queue::BoundedQueue;
use serde::Serialize;
use std::sync::Arc;

/// Final account of one consumer's run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsumerReport {
    pub consumer_id: usize,
    pub processed: usize,
    /// Items processed after the queue was observed closed
    pub drained_after_close: usize,
    /// Completion records in the order this consumer finished them
    pub records: Vec<CompletionRecord>,
}

/// A single consumer
///
/// `dequeue` is the only channel through which it observes both data and the
/// end of the stream, so it cannot outlive a closed, empty queue.
pub struct Consumer {
    id: usize,
    processor: Arc<dyn ItemProcessor>,
    state: Arc<UnitState<ConsumerState>>,
}

impl Consumer {
    pub fn new(id: usize, processor: Arc<dyn ItemProcessor>) -> Self {
        Self {
            id,
            processor,
            state: Arc::new(UnitState::new(ConsumerState::Running)),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Shared handle on this consumer's lifecycle state
    pub fn state_handle(&self) -> Arc<UnitState<ConsumerState>> {
        Arc::clone(&self.state)
    }

    /// Process items until the queue reports end-of-stream
    pub async fn run(self, queue: Arc<BoundedQueue<WorkItem>>) -> ConsumerReport {
        log::debug!("Consumer {} started", self.id);
        let _stopped = TerminalOnDrop::new(Arc::clone(&self.state), ConsumerState::Stopped);

        let mut records = Vec::new();
        let mut drained_after_close = 0;

        while let Ok(item) = queue.dequeue().await {
            if self.state.get() == ConsumerState::Running && queue.is_closed() {
                self.state.set(ConsumerState::Draining);
                log::debug!(
                    "Consumer {} draining ({} still buffered)",
                    self.id,
                    queue.len()
                );
            }

            self.processor.process(self.id, &item).await;
            log::debug!("Consuming: {} (consumer {})", item, self.id);

            if self.state.get() == ConsumerState::Draining {
                drained_after_close += 1;
            }
            records.push(CompletionRecord::new(self.id, item));
        }

        log::debug!(
            "Consumer {} stopped after {} items",
            self.id,
            records.len()
        );

        ConsumerReport {
            consumer_id: self.id,
            processed: records.len(),
            drained_after_close,
            records,
        }
    }
}
