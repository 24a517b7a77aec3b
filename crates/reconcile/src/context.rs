//! Cancellation and deadline propagation for lifecycle calls
//!
//! Every remote operation receives a [`CallContext`]. The context carries an
//! optional deadline and a cancellation flag that can be tripped from another
//! thread through a [`CancelHandle`]. Provisioners check the context before
//! (and where it matters, after) expensive work and bail out with an
//! [`Interrupt`] instead of finishing the call.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Why a call stopped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Interrupt {
    /// The caller cancelled the operation through a [`CancelHandle`].
    #[error("operation cancelled")]
    Cancelled,

    /// The context deadline passed before the operation finished.
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation signal and deadline shared by one lifecycle call.
///
/// Contexts are cheap to clone; clones observe the same cancellation flag.
/// A context without a deadline never expires on its own.
#[derive(Debug, Clone)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl CallContext {
    /// Context that never expires and is only stopped by explicit cancel.
    pub fn background() -> Self {
        Self {
            deadline: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Context that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle that cancels this context (and all its clones) when triggered.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    /// Deadline this context expires at, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline. `None` when there is no deadline;
    /// zero when the deadline already passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Whether the context was explicitly cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Current interrupt state. Explicit cancellation wins over an
    /// expired deadline when both apply.
    pub fn interrupted(&self) -> Option<Interrupt> {
        if self.is_cancelled() {
            return Some(Interrupt::Cancelled);
        }
        match self.remaining() {
            Some(remaining) if remaining.is_zero() => Some(Interrupt::DeadlineExceeded),
            _ => None,
        }
    }

    /// Fail fast when the context is already interrupted.
    pub fn check(&self) -> Result<(), Interrupt> {
        match self.interrupted() {
            Some(interrupt) => Err(interrupt),
            None => Ok(()),
        }
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::background()
    }
}

/// Cancels a [`CallContext`] from outside the call.
///
/// Handles are clonable and thread-safe; the first `cancel` wins and
/// subsequent calls are no-ops.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Trip the cancellation flag.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}
