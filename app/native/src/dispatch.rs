//! Action dispatch.
//!
//! The classifier hands every emitted [`Action`] to an [`ActionDispatcher`]
//! and never waits for the result. [`ActionQueue`] is the stock dispatcher: a
//! bounded channel drained by a worker task that runs each action through an
//! [`ActionExecutor`] off the event-callback thread.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::gesture::Action;

/// Capacity of the action channel.
const ACTION_QUEUE_CAPACITY: usize = 256;

/// Errors that can occur while dispatching or executing an action.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The worker has stopped.
    #[error("Action queue closed")]
    QueueClosed,

    /// The worker is not keeping up.
    #[error("Action queue full")]
    QueueFull,

    /// The executor could not perform the action.
    #[error("Failed to execute {action}: {reason}")]
    ExecutionFailed { action: &'static str, reason: String },
}

/// Receives semantic actions from the classifier.
///
/// Implementations must return immediately: `dispatch` is called on the
/// event-callback thread.
pub trait ActionDispatcher: Send + Sync {
    fn dispatch(&self, action: Action);
}

impl<F> ActionDispatcher for F
where F: Fn(Action) + Send + Sync
{
    fn dispatch(&self, action: Action) { self(action) }
}

/// Performs an action against the operating system.
///
/// Called on a blocking worker thread, so implementations may block.
pub trait ActionExecutor: Send + Sync + 'static {
    /// # Errors
    ///
    /// Returns [`DispatchError::ExecutionFailed`] if the action could not be performed.
    fn execute(&self, action: Action) -> Result<(), DispatchError>;
}

/// Executor that only logs what it would do.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingExecutor;

impl ActionExecutor for LoggingExecutor {
    fn execute(&self, action: Action) -> Result<(), DispatchError> {
        match action {
            Action::SyntheticScroll { dx, dy } => {
                tracing::info!(action = action.name(), dx, dy, "dry run");
            }
            _ => tracing::info!(action = action.name(), "dry run"),
        }
        Ok(())
    }
}

/// Bounded fire-and-forget action queue.
///
/// Cheap to clone; all clones feed the same worker.
#[derive(Debug, Clone)]
pub struct ActionQueue {
    sender: mpsc::Sender<Action>,
}

impl ActionQueue {
    /// Spawns the worker on `runtime` and returns the queue feeding it.
    ///
    /// The worker stops once every clone of the queue is dropped.
    #[must_use]
    pub fn spawn<E: ActionExecutor>(executor: E, runtime: &Handle) -> Self {
        let (sender, receiver) = mpsc::channel(ACTION_QUEUE_CAPACITY);
        runtime.spawn(run_worker(Arc::new(executor), receiver));
        Self { sender }
    }

    /// Queues `action` without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::QueueFull`] when the worker is behind and
    /// [`DispatchError::QueueClosed`] when it has stopped.
    pub fn try_dispatch(&self, action: Action) -> Result<(), DispatchError> {
        self.sender.try_send(action).map_err(|err| match err {
            TrySendError::Full(_) => DispatchError::QueueFull,
            TrySendError::Closed(_) => DispatchError::QueueClosed,
        })
    }
}

impl ActionDispatcher for ActionQueue {
    fn dispatch(&self, action: Action) {
        if let Err(err) = self.try_dispatch(action) {
            tracing::warn!(action = action.name(), error = %err, "dropping action");
        }
    }
}

async fn run_worker<E: ActionExecutor>(executor: Arc<E>, mut receiver: mpsc::Receiver<Action>) {
    tracing::debug!("action worker started");

    while let Some(action) = receiver.recv().await {
        let executor = Arc::clone(&executor);
        let result = tokio::task::spawn_blocking(move || executor.execute(action)).await;

        match result {
            Ok(Ok(())) => tracing::trace!(action = action.name(), "action executed"),
            Ok(Err(err)) => tracing::error!(action = action.name(), error = %err, "action failed"),
            Err(err) => tracing::error!(action = action.name(), error = %err, "action worker panicked"),
        }
    }

    tracing::debug!("action worker stopped");
}
