//! Bounded Queue Component
//!
//! A capacity-bounded, closable FIFO queue shared by multiple concurrent
//! producers and consumers. It is the only shared resource in a pipeline:
//! producers and consumers never synchronise with each other directly.
//!
//! # Overview
//!
//! - **Backpressure**: `enqueue` suspends while the queue is full, capping memory use
//! - **FIFO**: items leave in the order they were accepted
//! - **Close for writes**: a one-way, idempotent, level-triggered transition;
//!   producers are refused with [`QueueClosed`], consumers keep draining buffered
//!   items and then observe [`EndOfStream`]
//! - **Broadcast end-of-stream**: every consumer, including late arrivals, sees
//!   `EndOfStream` once the queue is closed and empty
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐ ┌────────────┐ ┌────────────┐
//! │ Producer 0 │ │ Producer 1 │ │ Producer 2 │
//! └─────┬──────┘ └─────┬──────┘ └─────┬──────┘
//!       │ enqueue      │ enqueue      │ enqueue   (suspends while full)
//!       ▼              ▼              ▼
//! ┌─────────────────────────────────────────────┐
//! │        BoundedQueue (capacity = C)          │
//! │   ┌───┬───┬───┬───┬───┐                     │
//! │   │ 1 │ 2 │ 3 │ 4 │ 5 │   open | closed     │
//! │   └───┴───┴───┴───┴───┘                     │
//! └──────┬──────────────────────┬───────────────┘
//!        │ dequeue              │ dequeue         (suspends while empty)
//! ┌──────┴─────┐         ┌──────┴─────┐
//! │ Consumer 0 │         │ Consumer 1 │
//! └────────────┘         └────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use drainpipe::queue::BoundedQueue;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let queue = Arc::new(BoundedQueue::new(5)?);
//!
//! let producer_queue = Arc::clone(&queue);
//! let producer = tokio::spawn(async move {
//!     for i in 1..=10 {
//!         if producer_queue.enqueue(i).await.is_err() {
//!             break;
//!         }
//!     }
//! });
//!
//! producer.await?;
//! queue.close();
//!
//! while let Ok(item) = queue.dequeue().await {
//!     println!("Received: {}", item);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
mod bounded;
mod error;
mod types;

pub use bounded::BoundedQueue;
pub use error::{EndOfStream, QueueClosed, QueueError, QueueResult, TryEnqueueError};
pub use types::QueueStats;

#[cfg(test)]
mod tests;
