//! Public API for the pipeline
//!
//! External modules should import from here rather than directly from internal modules.

pub use crate::pipeline::coordinator::Pipeline;

// Configuration and errors
pub use crate::pipeline::config::PipelineConfig;
pub use crate::pipeline::error::{PipelineError, PipelineResult};

// Units and the processing seam
pub use crate::pipeline::consumer::{Consumer, ConsumerReport};
pub use crate::pipeline::item::{CompletionRecord, WorkItem};
pub use crate::pipeline::processor::{DelayProcessor, ItemProcessor};
pub use crate::pipeline::producer::{Producer, ProducerOutcome, ProducerReport};
pub use crate::pipeline::state::{ConsumerState, ProducerState};

// Reporting
pub use crate::pipeline::report::{
    PipelinePhase, PipelineReport, PipelineStatus, UnitFailure, UnitKind,
};
