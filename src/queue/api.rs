//! Public API for the queue system
//!
//! External modules should import from here rather than directly from internal modules.

pub use crate::queue::bounded::BoundedQueue;

// Error handling
pub use crate::queue::error::{EndOfStream, QueueClosed, QueueError, QueueResult, TryEnqueueError};

// Type definitions and statistics
pub use crate::queue::types::QueueStats;
