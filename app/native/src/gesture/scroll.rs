//! Scroll inversion and control-scroll zoom.
//!
//! Inversion rewrites the delta of discrete wheel ticks. Zoom integrates the
//! (already inverted) vertical delta while control is held and emits one zoom
//! step each time the running total reaches the threshold.

use super::types::{Action, Classification, RawEvent, ScrollDelta, Timestamp};
use crate::config::{Config, ZoomResetPolicy};
use crate::constants::scroll::ZOOM_SUPPRESSION_SECS;

#[derive(Debug, Clone, Default)]
pub struct ScrollProcessor {
    accumulator: f64,
    control_drag_active: bool,
    control_drag_started_at: Option<Timestamp>,
}

impl ScrollProcessor {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Current zoom accumulator value.
    #[must_use]
    pub const fn accumulator(&self) -> f64 { self.accumulator }

    /// Classifies one scroll tick.
    ///
    /// Afterwards `accumulator().abs() < config.zoom_threshold` holds.
    pub fn process(
        &mut self,
        event: &RawEvent,
        delta: ScrollDelta,
        continuous: bool,
        config: &Config,
    ) -> Classification {
        let inverted = config.invert_scroll && !continuous;
        let delta = if inverted { delta.inverted() } else { delta };

        if self.zoom_applies(event, config) {
            self.accumulator += delta.delta_y;

            if self.accumulator.abs() >= config.zoom_threshold {
                let action = if self.accumulator > 0.0 { Action::ZoomIn } else { Action::ZoomOut };
                self.accumulator = match config.zoom_reset_policy {
                    ZoomResetPolicy::Zero => 0.0,
                    ZoomResetPolicy::CarryRemainder => self.accumulator % config.zoom_threshold,
                };
                tracing::debug!(action = action.name(), remainder = self.accumulator, "scroll: zoom step");
                return Classification::consume_with(action);
            }
        }

        if inverted { Classification::modified(delta) } else { Classification::pass_through() }
    }

    /// Marks the start of a control-click scroll-drag at `now`.
    pub fn begin_control_drag(&mut self, now: Timestamp) {
        self.control_drag_active = true;
        self.control_drag_started_at = Some(now);
    }

    /// Marks the end of the control-click scroll-drag.
    pub const fn end_control_drag(&mut self) { self.control_drag_active = false; }

    pub fn reset(&mut self) { *self = Self::default(); }

    fn zoom_applies(&self, event: &RawEvent, config: &Config) -> bool {
        if !config.enable_scroll_zoom || !event.modifiers.control() || self.control_drag_active {
            return false;
        }

        self.control_drag_started_at
            .is_none_or(|started| event.timestamp - started > ZOOM_SUPPRESSION_SECS)
    }
}
