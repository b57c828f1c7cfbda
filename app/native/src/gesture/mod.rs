//! Gesture classification core.
//!
//! - [`types`] - events, buttons, actions and dispositions
//! - [`debounce`] - per-button bounce rejection for the lateral buttons
//! - [`classifier`] - the pure transition table
//! - [`state_machine`] - gesture state and click-timeout epochs
//! - [`scroll`] - scroll inversion and zoom accumulation
//!
//! Nothing in here performs I/O, blocks or returns an error.

pub mod classifier;
pub mod debounce;
pub mod scroll;
pub mod state_machine;
pub mod types;

pub use classifier::{ScrollDragSignal, Step, TimerCommand};
pub use debounce::{ButtonDebounceState, DebounceFilter, Verdict};
pub use scroll::ScrollProcessor;
pub use state_machine::{GestureStateMachine, Outcome, TimerRequest};
pub use types::{
    Action, ActionList, ButtonId, Classification, Disposition, EventKind, GestureState, Modifiers,
    Point, RawEvent, ScrollDelta, Timestamp, Transition,
};
