//! Per-button debounce for the lateral navigation buttons.
//!
//! Side buttons on cheap mice bounce: a single press may arrive as several
//! Down/Up pairs a few milliseconds apart, or as an Up with no Down at all.
//! The filter keeps one [`ButtonDebounceState`] per tracked button and decides
//! for each transition whether it is genuine.
//!
//! A Down is accepted when it is outside the duplicate-cluster window of the
//! previous transition and outside the debounce interval of the previous
//! press. An Up is accepted (and its navigation action fires) only when it
//! closes a pending press whose duration lies within the configured click
//! bounds and it is at least the debounce interval after the previous Up.
//!
//! Inconsistent states are repaired in place, never reported.

use smallvec::SmallVec;

use super::types::{ButtonId, Timestamp, Transition};
use crate::config::Config;

/// Outcome of filtering one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Suppress,
}

/// Timing state for one tracked button.
///
/// Invariant: `is_pressed` implies `last_down_at >= last_up_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ButtonDebounceState {
    pub is_pressed: bool,
    pub last_down_at: Option<Timestamp>,
    pub last_up_at: Option<Timestamp>,
    pub last_event_at: Option<Timestamp>,
    pub pending_action: bool,
    pub click_count: u32,
}

impl ButtonDebounceState {
    fn on_down(&mut self, now: Timestamp, config: &Config) -> Verdict {
        if elapsed(now, self.last_event_at) < config.event_cluster_threshold_sec {
            tracing::trace!("debounce: down inside duplicate cluster");
            return Verdict::Suppress;
        }

        if !self.is_pressed && elapsed(now, self.last_down_at) < config.debounce_interval_sec {
            tracing::trace!("debounce: down inside debounce interval");
            return Verdict::Suppress;
        }

        // The cluster check above already rejected a repeat inside the window.
        if self.is_pressed {
            tracing::warn!("debounce: press without release, resetting button state");
            *self = Self::default();
        }

        self.is_pressed = true;
        self.last_down_at = Some(now);
        self.last_event_at = Some(now);
        self.pending_action = true;
        self.click_count = self.click_count.saturating_add(1);

        Verdict::Allow
    }

    fn on_up(&mut self, now: Timestamp, config: &Config) -> Verdict {
        let verdict = if elapsed(now, self.last_event_at) < config.event_cluster_threshold_sec {
            tracing::trace!("debounce: up inside duplicate cluster");
            Verdict::Suppress
        } else if let (true, Some(down_at)) = (self.is_pressed, self.last_down_at) {
            let click_duration = now - down_at;
            let in_bounds = click_duration >= config.min_click_duration_sec
                && click_duration <= config.max_click_duration_sec;
            let double_click = elapsed(now, self.last_up_at) < config.debounce_interval_sec;

            let verdict = if in_bounds && self.pending_action && !double_click {
                Verdict::Allow
            } else {
                tracing::trace!(
                    click_duration,
                    in_bounds,
                    double_click,
                    pending = self.pending_action,
                    "debounce: up rejected"
                );
                Verdict::Suppress
            };
            self.pending_action = false;
            verdict
        } else {
            tracing::debug!("debounce: stray up without press, resetting button state");
            *self = Self::default();
            Verdict::Suppress
        };

        self.is_pressed = false;
        self.last_up_at = Some(now);
        self.last_event_at = Some(now);

        verdict
    }
}

/// Seconds since `since`, or infinity if it never happened.
fn elapsed(now: Timestamp, since: Option<Timestamp>) -> f64 {
    since.map_or(f64::INFINITY, |t| now - t)
}

/// Debounce filter over a fixed set of tracked buttons.
#[derive(Debug, Clone)]
pub struct DebounceFilter {
    buttons: SmallVec<[(ButtonId, ButtonDebounceState); 2]>,
}

impl Default for DebounceFilter {
    fn default() -> Self { Self::new(&[ButtonId::LateralBack, ButtonId::LateralForward]) }
}

impl DebounceFilter {
    /// Creates a filter tracking `buttons`.
    #[must_use]
    pub fn new(buttons: &[ButtonId]) -> Self {
        Self {
            buttons: buttons.iter().map(|&id| (id, ButtonDebounceState::default())).collect(),
        }
    }

    /// Returns whether `button` is debounced by this filter.
    #[must_use]
    pub fn is_tracked(&self, button: ButtonId) -> bool {
        self.buttons.iter().any(|(id, _)| *id == button)
    }

    /// Filters one transition of `button` at time `now`.
    ///
    /// Untracked buttons are always allowed.
    pub fn filter(
        &mut self,
        button: ButtonId,
        transition: Transition,
        now: Timestamp,
        config: &Config,
    ) -> Verdict {
        let Some(state) = self.state_mut(button) else {
            return Verdict::Allow;
        };

        let verdict = match transition {
            Transition::Down => state.on_down(now, config),
            Transition::Up => state.on_up(now, config),
        };

        tracing::trace!(?button, ?transition, ?verdict, "debounce");
        verdict
    }

    /// Drops the pending action of `button` (the press turned into a drag).
    pub fn cancel_pending(&mut self, button: ButtonId) {
        if let Some(state) = self.state_mut(button) {
            state.pending_action = false;
        }
    }

    /// Returns the state of a tracked button.
    #[must_use]
    pub fn state(&self, button: ButtonId) -> Option<ButtonDebounceState> {
        self.buttons.iter().find(|(id, _)| *id == button).map(|(_, state)| *state)
    }

    /// Resets every tracked button.
    pub fn reset(&mut self) {
        for (_, state) in &mut self.buttons {
            *state = ButtonDebounceState::default();
        }
    }

    fn state_mut(&mut self, button: ButtonId) -> Option<&mut ButtonDebounceState> {
        self.buttons.iter_mut().find(|(id, _)| *id == button).map(|(_, state)| state)
    }
}
