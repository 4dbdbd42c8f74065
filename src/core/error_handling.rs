//! Generic error handling utilities
//!
//! Provides unified fatal-error logging that distinguishes errors the user can fix
//! (bad configuration, invalid counts) from system errors (I/O, runtime failures).

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)`; otherwise it should return `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error carries a message the user can act on directly
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<String>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// User-actionable errors log their own message; system errors log the operation
/// context. Full details always go to debug level.
///
/// # Examples
/// ```rust,no_run
/// # use drainpipe::core::error_handling::log_error_with_context;
/// # use drainpipe::pipeline::PipelineError;
/// let err = PipelineError::InvalidConsumerCount;
/// log_error_with_context(&err, "Pipeline construction");
/// // Logs: "FATAL: Pipeline needs at least one consumer"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    log::error!("FATAL: {}", fatal_message(error, operation_context));
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

/// The line shown to the user for a fatal error
fn fatal_message<E: ContextualError>(error: &E, operation_context: &str) -> String {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => user_msg,
        _ => operation_context.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct TestUserError {
        message: String,
    }

    impl fmt::Display for TestUserError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.message)
        }
    }

    impl std::error::Error for TestUserError {}

    impl ContextualError for TestUserError {
        fn is_user_actionable(&self) -> bool {
            true
        }

        fn user_message(&self) -> Option<String> {
            Some(self.message.clone())
        }
    }

    #[derive(Debug)]
    struct TestSystemError;

    /// Carries a message but does not want it shown
    #[derive(Debug)]
    struct TestInternalError;

    impl fmt::Display for TestInternalError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "lifecycle lock poisoned")
        }
    }

    impl std::error::Error for TestInternalError {}

    impl ContextualError for TestInternalError {
        fn is_user_actionable(&self) -> bool {
            false
        }

        fn user_message(&self) -> Option<String> {
            Some("lifecycle lock poisoned".to_string())
        }
    }

    impl fmt::Display for TestSystemError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "System error: runtime unavailable")
        }
    }

    impl std::error::Error for TestSystemError {}

    impl ContextualError for TestSystemError {
        fn is_user_actionable(&self) -> bool {
            false
        }

        fn user_message(&self) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_user_actionable_error_shows_specific_message() {
        let error = TestUserError {
            message: "capacity must be greater than 0".to_string(),
        };

        assert!(error.is_user_actionable());
        assert_eq!(
            error.user_message().as_deref(),
            Some("capacity must be greater than 0")
        );
        assert_eq!(
            fatal_message(&error, "Configuration loading"),
            "capacity must be greater than 0"
        );
        log_error_with_context(&error, "Configuration loading");
    }

    #[test]
    fn test_system_error_uses_generic_context() {
        let error = TestSystemError;

        assert!(!error.is_user_actionable());
        assert_eq!(error.user_message(), None);
        assert_eq!(fatal_message(&error, "Runtime startup"), "Runtime startup");
        log_error_with_context(&error, "Runtime startup");
    }

    #[test]
    fn test_message_ignored_unless_user_actionable() {
        assert_eq!(
            fatal_message(&TestInternalError, "Pipeline run"),
            "Pipeline run"
        );
    }
}
