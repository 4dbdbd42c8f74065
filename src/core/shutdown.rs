//! Shutdown Coordination
//!
//! Provides a level-triggered, idempotent shutdown token plus the signal handlers
//! that raise it. Once raised the token stays raised, so a task that starts
//! waiting after the fact still observes it instead of missing a one-shot pulse.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Broadcast shutdown signal shared by everything that must stop together
///
/// Cloning is cheap; all clones observe the same state.
#[derive(Debug, Clone)]
pub struct ShutdownToken {
    state: Arc<watch::Sender<bool>>,
}

impl Default for ShutdownToken {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownToken {
    /// Create a new, unraised token
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    /// Raise the token
    ///
    /// Returns `true` only for the call that actually raised it; raising an
    /// already-raised token is a no-op.
    pub fn trigger(&self) -> bool {
        self.state.send_if_modified(|raised| {
            if *raised {
                false
            } else {
                *raised = true;
                true
            }
        })
    }

    /// Check if shutdown has been requested
    pub fn is_triggered(&self) -> bool {
        *self.state.borrow()
    }

    /// Wait until the token is raised (returns immediately if it already is)
    pub async fn triggered(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait
        let _ = rx.wait_for(|raised| *raised).await;
    }
}

/// Set up signal handlers that raise `token`
///
/// The first signal requests a graceful drain; a second one forces exit 130.
/// Must be called from within a tokio runtime.
pub fn install_signal_handlers(token: ShutdownToken) {
    let signal_count = Arc::new(AtomicUsize::new(0));

    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }

        use tokio::signal::unix::{signal, SignalKind};
        let signals = [
            (SignalKind::interrupt(), "SIGINT"),
            (SignalKind::terminate(), "SIGTERM"),
            (SignalKind::hangup(), "SIGHUP"),
            (SignalKind::quit(), "SIGQUIT"),
        ];

        for (kind, name) in signals {
            let token = token.clone();
            let sig_ctr = signal_count.clone();

            tokio::spawn(async move {
                if let Ok(mut sig) = signal(kind) {
                    while sig.recv().await.is_some() {
                        on_signal(&token, &sig_ctr, name);
                    }
                }
            });
        }
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                on_signal(&token, &signal_count, "Ctrl-C");
            }
        });
    }
}

fn on_signal(token: &ShutdownToken, counter: &AtomicUsize, name: &str) {
    let prev = counter.fetch_add(1, Ordering::AcqRel);
    if prev >= 1 {
        log::warn!("{} received again; exiting immediately", name);
        std::process::exit(130);
    }
    log::info!("{} received; draining pipeline (signal again to force exit)", name);
    token.trigger();
}
