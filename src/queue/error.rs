//! Queue Error Types

use std::fmt;

/// Construction-time queue errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("Queue capacity must be greater than 0 (got {capacity})")]
    InvalidCapacity { capacity: usize },
}

/// Result type for queue construction
pub type QueueResult<T> = Result<T, QueueError>;

/// The queue was closed for writes; the rejected item is handed back
#[derive(PartialEq, Eq, thiserror::Error)]
#[error("Queue is closed for writes")]
pub struct QueueClosed<T>(pub T);

impl<T> QueueClosed<T> {
    /// Take back the item that was not enqueued
    pub fn into_inner(self) -> T {
        self.0
    }
}

// Manual impl so `T` need not be Debug
impl<T> fmt::Debug for QueueClosed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("QueueClosed(..)")
    }
}

/// Terminal signal: the queue is closed and permanently empty
///
/// Not a failure; consumers treat it as the normal end of their loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("End of stream: queue is closed and drained")]
pub struct EndOfStream;

/// Failure of a non-blocking enqueue
#[derive(PartialEq, Eq, thiserror::Error)]
pub enum TryEnqueueError<T> {
    #[error("Queue is full")]
    Full(T),

    #[error("Queue is closed for writes")]
    Closed(T),
}

impl<T> TryEnqueueError<T> {
    /// Take back the item that was not enqueued
    pub fn into_inner(self) -> T {
        match self {
            TryEnqueueError::Full(item) | TryEnqueueError::Closed(item) => item,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, TryEnqueueError::Closed(_))
    }
}

impl<T> fmt::Debug for TryEnqueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryEnqueueError::Full(_) => f.write_str("Full(..)"),
            TryEnqueueError::Closed(_) => f.write_str("Closed(..)"),
        }
    }
}

impl<T> From<QueueClosed<T>> for TryEnqueueError<T> {
    fn from(closed: QueueClosed<T>) -> Self {
        TryEnqueueError::Closed(closed.0)
    }
}
