//! Run reports and status snapshots

use crate::pipeline::consumer::ConsumerReport;
use crate::pipeline::producer::ProducerReport;
use crate::pipeline::state::{ConsumerState, ProducerState};
use crate::queue::QueueStats;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Kind of task a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Producer,
    Consumer,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Producer => write!(f, "producer"),
            UnitKind::Consumer => write!(f, "consumer"),
        }
    }
}

/// A unit that did not return a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitFailure {
    pub kind: UnitKind,
    pub id: usize,
    pub message: String,
    pub panicked: bool,
}

impl fmt::Display for UnitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} failed: {}", self.kind, self.id, self.message)
    }
}

/// Outcome of a whole pipeline run, shared by every caller of `stop`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub producers: Vec<ProducerReport>,
    pub consumers: Vec<ConsumerReport>,
    pub queue: QueueStats,
    pub failures: Vec<UnitFailure>,
    pub elapsed_ms: u64,
}

impl PipelineReport {
    pub fn total_delivered(&self) -> usize {
        self.producers.iter().map(|p| p.delivered).sum()
    }

    pub fn total_processed(&self) -> usize {
        self.consumers.iter().map(|c| c.processed).sum()
    }

    /// No failures and every delivered item was processed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
            && self.total_delivered() == self.total_processed()
            && self.queue.is_drained()
    }

    /// Delivered count keyed by producer id
    pub fn delivered_by_producer(&self) -> BTreeMap<usize, usize> {
        self.producers
            .iter()
            .map(|p| (p.producer_id, p.delivered))
            .collect()
    }

    /// Processed count keyed by the producer that emitted the items
    pub fn processed_by_producer(&self) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for record in self.consumers.iter().flat_map(|c| c.records.iter()) {
            *counts.entry(record.item.producer_id).or_insert(0) += 1;
        }
        counts
    }

    /// Processed count keyed by consumer id
    pub fn processed_by_consumer(&self) -> BTreeMap<usize, usize> {
        self.consumers
            .iter()
            .map(|c| (c.consumer_id, c.processed))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelinePhase {
    Idle,
    Running,
    Stopping,
    Stopped,
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelinePhase::Idle => "idle",
            PipelinePhase::Running => "running",
            PipelinePhase::Stopping => "stopping",
            PipelinePhase::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Live snapshot of the pipeline, safe to take at any time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineStatus {
    pub phase: PipelinePhase,
    pub producers: Vec<ProducerState>,
    pub consumers: Vec<ConsumerState>,
    pub queue: QueueStats,
}
