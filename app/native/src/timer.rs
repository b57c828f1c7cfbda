//! Click-timeout timer seam.
//!
//! The gesture state machine arms a one-shot timer when the middle button goes
//! down. The timer fires on a different thread than the event callback, so the
//! callback it runs re-enters the engine through the same mutex and checks an
//! epoch before acting. Cancellation is therefore best effort: a handle may be
//! cancelled after its callback already ran.

use std::fmt;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::error::MouseflowError;

/// Callback run when a timer fires.
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Schedules one-shot callbacks.
pub trait TimerScheduler: Send + Sync {
    /// Runs `callback` once after `delay`, unless the returned handle is cancelled first.
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;
}

/// Cancellation handle for a scheduled callback.
///
/// Dropping the handle does not cancel the timer.
#[derive(Default)]
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl TimerHandle {
    /// Creates a handle that runs `cancel` on the first call to [`TimerHandle::cancel`].
    #[must_use]
    pub fn new<F>(cancel: F) -> Self
    where F: FnOnce() + Send + 'static {
        Self { cancel: Some(Box::new(cancel)) }
    }

    /// A handle with nothing to cancel.
    #[must_use]
    pub const fn detached() -> Self { Self { cancel: None } }

    /// Cancels the timer. Idempotent and safe after the timer fired.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle").field("armed", &self.cancel.is_some()).finish()
    }
}

/// [`TimerScheduler`] backed by tokio tasks.
#[derive(Debug, Clone)]
pub struct TokioTimer {
    handle: Handle,
}

impl TokioTimer {
    #[must_use]
    pub const fn new(handle: Handle) -> Self { Self { handle } }

    /// Uses the runtime of the calling context.
    ///
    /// # Errors
    ///
    /// Returns [`MouseflowError::Timer`] when called outside a tokio runtime.
    pub fn current() -> Result<Self, MouseflowError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|err| MouseflowError::Timer(err.to_string()))
    }
}

impl TimerScheduler for TokioTimer {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });

        TimerHandle::new(move || task.abort())
    }
}
