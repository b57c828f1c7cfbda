//! Mouseflow - gesture classification core for pointer, button and scroll events.
//!
//! An event source (an OS event tap or any other adapter) pushes every raw
//! pointer, button and scroll event into an [`EventPump`], which decides
//! synchronously whether to pass the event through, pass it through with a
//! rewritten scroll delta, or consume it. Consumed events may emit semantic
//! [`Action`]s (switch space, toggle Mission Control, zoom, navigate back and
//! forward, synthetic scroll) that are handed to an [`ActionDispatcher`] and
//! executed off the event thread.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mouseflow_lib::{ActionQueue, Classifier, Config, EventPump, LoggingExecutor, RawEvent, TokioTimer};
//!
//! # fn main() -> Result<(), mouseflow_lib::MouseflowError> {
//! let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
//! let queue = ActionQueue::spawn(LoggingExecutor, runtime.handle());
//! let timer = TokioTimer::new(runtime.handle().clone());
//!
//! let pump = EventPump::new(Config::default(), Arc::new(queue), Arc::new(timer));
//! let disposition = pump.on_event(&RawEvent::moved(10.0, 20.0, 0.0));
//! assert!(!disposition.is_consumed());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod gesture;
pub mod logging;
pub mod pump;
pub mod source;
pub mod timer;

mod utils;

pub use config::{Config, ConfigSource, SharedConfig, ZoomResetPolicy};
pub use dispatch::{ActionDispatcher, ActionExecutor, ActionQueue, DispatchError, LoggingExecutor};
pub use error::MouseflowError;
pub use gesture::{
    Action, ButtonId, Classification, Disposition, GestureState, Modifiers, Point, RawEvent,
    ScrollDelta,
};
pub use pump::{Classifier, EventPump};
pub use source::{EventInterest, EventSink, EventSource, Monitor};
pub use timer::{TimerHandle, TimerScheduler, TokioTimer};
