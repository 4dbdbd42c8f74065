//! Producer/Consumer Pipeline
//!
//! Wires a fixed number of producers and consumers to one shared
//! [`BoundedQueue`](crate::queue::BoundedQueue) and shuts them down
//! gracefully: the queue is closed exactly once, producers stop, consumers
//! drain whatever is buffered, and every unit is joined before the final
//! [`PipelineReport`] is returned.
//!
//! # Architecture
//!
//! ```text
//!  Producer 0..N ──enqueue──► BoundedQueue ──dequeue──► Consumer 0..K
//!        ▲                        ▲                          │
//!        │ closed()               │ close() (once)           ▼
//!        └──────────────── Pipeline ◄──── ShutdownToken ◄── stop() / signal
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use drainpipe::pipeline::{Pipeline, PipelineConfig};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::new(5, 1, 1, 10)
//!     .with_think_time(Duration::ZERO)
//!     .with_processing_time(Duration::ZERO);
//! let pipeline = Pipeline::new(config)?;
//!
//! pipeline.start()?;
//! let report = pipeline.run_to_completion().await?;
//! assert_eq!(report.total_processed(), 10);
//! # Ok(())
//! # }
//! ```

pub mod api;
mod config;
mod consumer;
mod coordinator;
mod error;
mod item;
mod processor;
mod producer;
mod report;
mod state;

pub use config::PipelineConfig;
pub use consumer::{Consumer, ConsumerReport};
pub use coordinator::Pipeline;
pub use error::{PipelineError, PipelineResult};
pub use item::{CompletionRecord, WorkItem};
pub use processor::{DelayProcessor, ItemProcessor};
pub use producer::{Producer, ProducerOutcome, ProducerReport};
pub use report::{PipelinePhase, PipelineReport, PipelineStatus, UnitFailure, UnitKind};
pub use state::{ConsumerState, ProducerState};

#[cfg(test)]
mod tests;
