//! Type definitions for the queue system

use serde::Serialize;

/// Point-in-time snapshot of a queue's counters
///
/// Taken under the queue lock, so `dequeued_total + buffered == enqueued_total`
/// holds for every snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    /// Fixed maximum number of buffered items
    pub capacity: usize,
    /// Items currently buffered
    pub buffered: usize,
    /// Items accepted by `enqueue`/`try_enqueue` since construction
    pub enqueued_total: u64,
    /// Items handed out by `dequeue`/`try_dequeue` since construction
    pub dequeued_total: u64,
    /// Enqueue attempts refused because the queue was closed
    pub rejected_total: u64,
    /// Largest `buffered` value ever observed
    pub high_watermark: usize,
    /// Whether the queue has been closed for writes
    pub closed: bool,
}

impl QueueStats {
    /// Closed and nothing left to hand out
    pub fn is_drained(&self) -> bool {
        self.closed && self.buffered == 0
    }
}
