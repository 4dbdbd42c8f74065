//! Lock poisoning policy
//!
//! Two ways to deal with a lock whose holder panicked: recover the guard when
//! the protected state is always consistent (the queue buffer), or surface an
//! error when it is not (the pipeline lifecycle).

use std::sync::{LockResult, PoisonError};

/// Recover the guard from a poisoned lock
///
/// Only valid for state that is never left half-updated across a panic point
/// (every mutation completes before any user code runs). The poisoning is logged
/// so a panic elsewhere does not go unnoticed.
///
/// # Arguments
/// * `result` - The result from a mutex lock operation
/// * `context` - Human-readable name of the protected state, used in the log line
pub fn recover_poison<G>(result: LockResult<G>, context: &str) -> G {
    result.unwrap_or_else(|poison_err: PoisonError<G>| {
        log::warn!(
            "Recovered poisoned lock on {} (a panic occurred while it was held)",
            context
        );
        poison_err.into_inner()
    })
}

/// Turn a poisoned lock into a caller-defined error
///
/// `error_constructor` receives a description of the poisoning.
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use drainpipe::core::sync::handle_mutex_poison;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(mutex.lock(), |msg| msg).unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|_| {
        error_constructor(
            "lock poisoned: a panic occurred while the lock was held".to_string(),
        )
    })
}
