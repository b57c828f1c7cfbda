//! Gesture state machine: owns the current [`GestureState`] and the
//! click-timeout timer.
//!
//! The machine never schedules timers itself. When a step arms the timeout it
//! returns a [`TimerRequest`]; the caller schedules it *after* releasing the
//! engine lock and hands the handle back through [`GestureStateMachine::attach_timer`].
//! Every arm, cancel and reset bumps an epoch, so a late timer callback or a
//! handle attached for a superseded request is recognised and ignored.

use std::time::Duration;

use super::classifier::{self, ScrollDragSignal, Step, TimerCommand};
use super::types::{ActionList, Disposition, GestureState, RawEvent};
use crate::config::Config;
use crate::timer::TimerHandle;

/// A timer the caller must schedule on behalf of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRequest {
    pub epoch: u64,
    pub delay: Duration,
}

/// Observable outcome of one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub disposition: Disposition,
    pub actions: ActionList,
    pub timer: Option<TimerRequest>,
    pub scroll_drag: ScrollDragSignal,
}

#[derive(Debug, Default)]
pub struct GestureStateMachine {
    state: GestureState,
    epoch: u64,
    pending_timer: Option<TimerHandle>,
}

impl GestureStateMachine {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub const fn state(&self) -> GestureState { self.state }

    /// Current timer epoch.
    #[must_use]
    pub const fn epoch(&self) -> u64 { self.epoch }

    /// Feeds one event through the transition table.
    pub fn handle(&mut self, event: &RawEvent, config: &Config) -> Outcome {
        let step = classifier::classify(&self.state, event, config);
        self.apply(step)
    }

    /// Stores the handle of the timer scheduled for `epoch`.
    ///
    /// A handle for a superseded epoch is cancelled immediately.
    pub fn attach_timer(&mut self, epoch: u64, mut handle: TimerHandle) {
        if epoch == self.epoch {
            self.pending_timer = Some(handle);
        } else {
            tracing::debug!(epoch, current = self.epoch, "gesture: dropping stale timer handle");
            handle.cancel();
        }
    }

    /// Handles the click timeout armed at `epoch`.
    ///
    /// A no-op unless `epoch` is still current and the machine is still tracking.
    pub fn on_timeout(&mut self, epoch: u64, config: &Config) -> ActionList {
        if epoch != self.epoch {
            tracing::trace!(epoch, current = self.epoch, "gesture: stale click timeout ignored");
            return ActionList::new();
        }

        // Fired: the handle has nothing left to cancel.
        self.pending_timer = None;
        self.epoch = self.epoch.wrapping_add(1);

        let Some(step) = classifier::on_click_timeout(&self.state, config) else {
            return ActionList::new();
        };

        tracing::debug!(from = self.state.name(), to = step.next.name(), "gesture: click timeout");
        self.state = step.next;
        step.actions
    }

    /// Forces the machine back to `Idle` and cancels any pending timer.
    pub fn reset(&mut self) {
        self.cancel_timer();
        if self.state != GestureState::Idle {
            tracing::debug!(from = self.state.name(), "gesture: reset to idle");
        }
        self.state = GestureState::Idle;
    }

    fn apply(&mut self, step: Step) -> Outcome {
        let timer = match step.timer {
            TimerCommand::Keep => None,
            TimerCommand::Cancel => {
                self.cancel_timer();
                None
            }
            TimerCommand::Arm(delay) => {
                self.cancel_timer();
                Some(TimerRequest { epoch: self.epoch, delay })
            }
        };

        if step.next != self.state {
            tracing::debug!(from = self.state.name(), to = step.next.name(), "gesture: transition");
        }
        self.state = step.next;

        Outcome {
            disposition: step.disposition,
            actions: step.actions,
            timer,
            scroll_drag: step.scroll_drag,
        }
    }

    fn cancel_timer(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if let Some(mut handle) = self.pending_timer.take() {
            tracing::debug!("gesture: click timeout cancelled");
            handle.cancel();
        }
    }
}
