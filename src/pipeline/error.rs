//! Pipeline Error Types

use crate::core::error_handling::ContextualError;
use crate::queue::QueueError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("Invalid queue configuration: {0}")]
    Queue(#[from] QueueError),

    #[error("Pipeline needs at least one consumer")]
    InvalidConsumerCount,

    #[error("Pipeline has already been started")]
    AlreadyStarted,

    #[error("Pipeline has not been started")]
    NotStarted,

    #[error("Internal pipeline error: {message}")]
    Internal { message: String },
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

impl ContextualError for PipelineError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            PipelineError::Queue(_) | PipelineError::InvalidConsumerCount
        )
    }

    fn user_message(&self) -> Option<String> {
        if self.is_user_actionable() {
            Some(self.to_string())
        } else {
            None
        }
    }
}
