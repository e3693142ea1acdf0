//! CLI interrupt tracking.
//!
//! Responsibilities:
//! - Provide a lightweight, dependency-free cancellation token that can be cloned
//!   and passed to the task launcher.
//! - Install the Ctrl+C listener that flips the token.
//! - Centralize the Unix-standard SIGINT exit code (130).
//!
//! Does NOT handle:
//! - Killing or signalling the task subprocess. The OS delivers the interrupt
//!   to the whole foreground process group; the launcher only waits.
//!
//! Invariants:
//! - Once cancelled, token remains cancelled forever.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::Notify;

/// Standard Unix exit code for SIGINT: 128 + 2.
pub const SIGINT_EXIT_CODE: u8 = 130;

/// Cancellation token usable across async tasks.
///
/// This is intentionally small and dependency-free (vs `tokio_util::sync::CancellationToken`).
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancellationToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel token (idempotent).
    pub fn cancel(&self) {
        let was_cancelled = self.cancelled.swap(true, Ordering::SeqCst);
        if !was_cancelled {
            self.notify.notify_waiters();
        }
    }

    /// True if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Await cancellation.
    ///
    /// Safe against missed notifications by creating `notified()` future first,
    /// then checking atomic state.
    pub async fn cancelled(&self) {
        let notified = self.notify.notified();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

/// Register the Ctrl+C listener and cancel `token` when it fires.
///
/// The signal is registered before this returns, so the launcher survives
/// an interrupt that arrives at any point after the call and can forward
/// the task's exit status.
pub fn install_ctrl_c_handler(token: &CancellationToken) -> std::io::Result<()> {
    #[cfg(unix)]
    let mut interrupt =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;
    #[cfg(windows)]
    let mut interrupt = tokio::signal::windows::ctrl_c()?;

    let token = token.clone();
    tokio::spawn(async move {
        if interrupt.recv().await.is_some() {
            tracing::info!("interrupt received");
            token.cancel();
        }
    });
    Ok(())
}
