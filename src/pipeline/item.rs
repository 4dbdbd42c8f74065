//! Work items and completion records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single unit of work, owned by exactly one stage at a time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Producer that emitted the item
    pub producer_id: usize,
    /// 1-based, strictly increasing per producer
    pub sequence: u64,
    pub produced_at: DateTime<Utc>,
}

impl WorkItem {
    pub fn new(producer_id: usize, sequence: u64) -> Self {
        Self {
            producer_id,
            sequence,
            produced_at: Utc::now(),
        }
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}#{}", self.producer_id, self.sequence)
    }
}

/// Emitted by a consumer once it has finished processing an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub consumer_id: usize,
    pub item: WorkItem,
    pub completed_at: DateTime<Utc>,
}

impl CompletionRecord {
    pub fn new(consumer_id: usize, item: WorkItem) -> Self {
        Self {
            consumer_id,
            item,
            completed_at: Utc::now(),
        }
    }
}
