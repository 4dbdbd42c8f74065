//! Producer - emits a finite, ordered sequence of work items

use crate::pipeline::item::WorkItem;
use crate::pipeline::state::{ProducerState, TerminalOnDrop, UnitState};
use crate::queue::BoundedQueue;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// How a producer's run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProducerOutcome {
    /// Every requested item was delivered
    Completed,
    /// The queue closed before all items were delivered
    Preempted,
}

/// Final account of one producer's run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProducerReport {
    pub producer_id: usize,
    /// Items the producer was asked to emit
    pub requested: usize,
    /// Items accepted by the queue
    pub delivered: usize,
    pub outcome: ProducerOutcome,
}

/// A single producer
///
/// Emits `item_count` items numbered from 1, waiting `think_time` before each.
/// The wait races against the queue closing, so shutdown pre-empts production
/// even while the producer is idle.
#[derive(Debug)]
pub struct Producer {
    id: usize,
    item_count: usize,
    think_time: Duration,
    state: Arc<UnitState<ProducerState>>,
}

impl Producer {
    pub fn new(id: usize, item_count: usize, think_time: Duration) -> Self {
        Self {
            id,
            item_count,
            think_time,
            state: Arc::new(UnitState::new(ProducerState::Running)),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Shared handle on this producer's lifecycle state
    pub fn state_handle(&self) -> Arc<UnitState<ProducerState>> {
        Arc::clone(&self.state)
    }

    /// Emit items until done or the queue closes
    ///
    /// Never touches the queue after returning.
    pub async fn run(self, queue: Arc<BoundedQueue<WorkItem>>) -> ProducerReport {
        log::debug!("Producer {} started ({} items)", self.id, self.item_count);
        let _finished = TerminalOnDrop::new(Arc::clone(&self.state), ProducerState::Finished);

        let mut delivered = 0;
        let mut outcome = ProducerOutcome::Completed;

        for sequence in 1..=self.item_count as u64 {
            if !self.think_time.is_zero() {
                tokio::select! {
                    biased;
                    _ = queue.closed() => {
                        outcome = ProducerOutcome::Preempted;
                        break;
                    }
                    _ = tokio::time::sleep(self.think_time) => {}
                }
            }

            let item = WorkItem::new(self.id, sequence);
            log::debug!("Producing: {}", item);

            if let Err(rejected) = queue.enqueue(item).await {
                log::warn!(
                    "Producer {}: {} not delivered, queue closed",
                    self.id,
                    rejected.into_inner()
                );
                outcome = ProducerOutcome::Preempted;
                break;
            }
            delivered += 1;
        }

        log::debug!(
            "Producer {} finished: {}/{} delivered",
            self.id,
            delivered,
            self.item_count
        );

        ProducerReport {
            producer_id: self.id,
            requested: self.item_count,
            delivered,
            outcome,
        }
    }
}
