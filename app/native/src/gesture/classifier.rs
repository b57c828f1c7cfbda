//! Transition table of the middle-button and control-drag gestures.
//!
//! [`classify`] is a pure function of the current [`GestureState`], one event
//! and the configuration. It does no I/O and owns no timers: it only describes
//! what should happen in a [`Step`], which the state machine then applies.
//!
//! | State          | Event                     | Guard            | Next           |
//! |----------------|---------------------------|------------------|----------------|
//! | Idle           | Down(Middle)              |                  | Tracking       |
//! | Idle           | Down(Left) + control      |                  | ScrollDragging |
//! | Tracking       | Up(Middle)                |                  | Idle           |
//! | Tracking       | Moved / Dragged           | distance > 8 pt  | Dragging       |
//! | Tracking       | click timeout             |                  | AwaitingExit   |
//! | Dragging       | Moved / Dragged           | abs(dx) > thresh | Idle           |
//! | Dragging       | Up(Middle)                |                  | Idle           |
//! | ScrollDragging | Dragged(Left)             |                  | ScrollDragging |
//! | ScrollDragging | Up(Left)                  |                  | Idle           |
//! | AwaitingExit   | Down(Middle)              |                  | Idle           |
//!
//! Any other combination leaves the state alone and passes the event through.

use std::time::Duration;

use super::types::{
    Action, ActionList, ButtonId, Disposition, EventKind, GestureState, Point, RawEvent,
};
use crate::config::Config;
use crate::constants::{gesture, scroll};

/// What to do with the click-timeout timer after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Keep,
    Arm(Duration),
    Cancel,
}

/// Control-click scroll-drag boundary crossed by a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDragSignal {
    None,
    Begin,
    End,
}

/// Result of classifying one event against the current state.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub next: GestureState,
    pub disposition: Disposition,
    pub actions: ActionList,
    pub timer: TimerCommand,
    pub scroll_drag: ScrollDragSignal,
}

impl Step {
    /// No transition: keep `state` and pass the event through.
    #[must_use]
    pub fn unchanged(state: GestureState) -> Self {
        Self {
            next: state,
            disposition: Disposition::PassThrough,
            actions: ActionList::new(),
            timer: TimerCommand::Keep,
            scroll_drag: ScrollDragSignal::None,
        }
    }

    fn to(next: GestureState, disposition: Disposition) -> Self {
        Self { disposition, ..Self::unchanged(next) }
    }

    fn emit(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    fn emit_if(self, enabled: bool, action: Action) -> Self {
        if enabled { self.emit(action) } else { self }
    }

    fn timer(mut self, command: TimerCommand) -> Self {
        self.timer = command;
        self
    }

    fn scroll_drag(mut self, signal: ScrollDragSignal) -> Self {
        self.scroll_drag = signal;
        self
    }
}

/// Classifies `event` in `state`.
#[must_use]
pub fn classify(state: &GestureState, event: &RawEvent, config: &Config) -> Step {
    let location = event.location;

    match (*state, event.kind) {
        (GestureState::Idle, EventKind::ButtonDown(ButtonId::Middle)) => Step::to(
            GestureState::Tracking { start: location, armed_at: event.timestamp },
            Disposition::Consume,
        )
        .timer(TimerCommand::Arm(config.click_timeout())),

        (GestureState::Idle, EventKind::ButtonDown(ButtonId::Left)) if event.modifiers.control() => {
            Step::to(GestureState::ScrollDragging { last_point: location }, Disposition::Consume)
                .scroll_drag(ScrollDragSignal::Begin)
        }

        (GestureState::Tracking { start, .. }, EventKind::ButtonUp(ButtonId::Middle)) => {
            let is_click = start.distance_to(location) <= gesture::CLICK_DISTANCE_PX;
            Step::to(GestureState::Idle, Disposition::Consume)
                .timer(TimerCommand::Cancel)
                .emit_if(
                    is_click && config.enable_mission_control,
                    Action::ActivateMissionControlToggle,
                )
        }

        (
            GestureState::Tracking { start, .. },
            EventKind::PointerMoved | EventKind::PointerDragged(_),
        ) if start.distance_to(location) > gesture::MOVE_THRESHOLD_PX => {
            Step::to(GestureState::Dragging { start }, Disposition::PassThrough)
                .timer(TimerCommand::Cancel)
        }

        (
            GestureState::Dragging { start },
            EventKind::PointerMoved | EventKind::PointerDragged(_),
        ) => classify_drag(start, location, config),

        (GestureState::Dragging { .. }, EventKind::ButtonUp(ButtonId::Middle)) => {
            Step::to(GestureState::Idle, Disposition::Consume)
        }

        (GestureState::ScrollDragging { last_point }, EventKind::PointerDragged(ButtonId::Left)) => {
            let dx = location.x - last_point.x;
            let dy = location.y - last_point.y;
            Step::to(GestureState::ScrollDragging { last_point: location }, Disposition::Consume)
                .emit(Action::SyntheticScroll {
                    dx: -dx * scroll::SCROLL_DRAG_SCALE,
                    dy: -dy * scroll::SCROLL_DRAG_SCALE,
                })
        }

        (GestureState::ScrollDragging { .. }, EventKind::ButtonUp(ButtonId::Left)) => {
            Step::to(GestureState::Idle, Disposition::Consume).scroll_drag(ScrollDragSignal::End)
        }

        (GestureState::AwaitingExit, EventKind::ButtonDown(ButtonId::Middle)) => {
            Step::to(GestureState::Idle, Disposition::Consume)
                .emit_if(config.enable_mission_control, Action::ActivateMissionControlToggle)
        }

        (current, _) => Step::unchanged(current),
    }
}

fn classify_drag(start: Point, location: Point, config: &Config) -> Step {
    let dx = location.x - start.x;
    if dx.abs() <= config.drag_threshold_px {
        return Step::unchanged(GestureState::Dragging { start });
    }

    let action = if (dx > 0.0) != config.invert_drag_direction {
        Action::MoveToNextSpace
    } else {
        Action::MoveToPreviousSpace
    };

    Step::to(GestureState::Idle, Disposition::Consume)
        .emit_if(config.enable_space_navigation, action)
}

/// Classifies the click-timeout firing in `state`.
///
/// Returns `None` when the timeout no longer applies (the press already
/// resolved into a click or a drag).
#[must_use]
pub fn on_click_timeout(state: &GestureState, config: &Config) -> Option<Step> {
    let GestureState::Tracking { .. } = state else {
        return None;
    };

    // With Mission Control disabled there is nothing to exit.
    let step = if config.enable_mission_control {
        Step::to(GestureState::AwaitingExit, Disposition::Consume)
            .emit(Action::ActivateMissionControlToggle)
    } else {
        Step::to(GestureState::Idle, Disposition::Consume)
    };

    Some(step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::types::Modifiers;

    fn tracking_at(x: f64, y: f64) -> GestureState {
        GestureState::Tracking { start: Point::new(x, y), armed_at: 0.0 }
    }

    #[test]
    fn test_middle_down_starts_tracking_and_arms_timer() {
        let config = Config::default();
        let step = classify(
            &GestureState::Idle,
            &RawEvent::button_down(ButtonId::Middle, 10.0, 20.0, 1.5),
            &config,
        );

        assert_eq!(step.next, GestureState::Tracking { start: Point::new(10.0, 20.0), armed_at: 1.5 });
        assert_eq!(step.disposition, Disposition::Consume);
        assert_eq!(step.timer, TimerCommand::Arm(Duration::from_millis(500)));
        assert!(step.actions.is_empty());
    }

    #[test]
    fn test_click_emits_mission_control() {
        let step = classify(
            &tracking_at(0.0, 0.0),
            &RawEvent::button_up(ButtonId::Middle, 3.0, 4.0, 0.05),
            &Config::default(),
        );

        assert_eq!(step.next, GestureState::Idle);
        assert_eq!(step.timer, TimerCommand::Cancel);
        assert_eq!(step.actions.as_slice(), &[Action::ActivateMissionControlToggle]);
    }

    #[test]
    fn test_release_beyond_click_distance_is_discarded() {
        let step = classify(
            &tracking_at(0.0, 0.0),
            &RawEvent::button_up(ButtonId::Middle, 6.0, 0.0, 0.05),
            &Config::default(),
        );

        assert_eq!(step.next, GestureState::Idle);
        assert!(step.actions.is_empty());
    }

    #[test]
    fn test_click_with_mission_control_disabled() {
        let config = Config { enable_mission_control: false, ..Default::default() };
        let step = classify(
            &tracking_at(0.0, 0.0),
            &RawEvent::button_up(ButtonId::Middle, 0.0, 0.0, 0.05),
            &config,
        );

        assert_eq!(step.next, GestureState::Idle);
        assert!(step.actions.is_empty());
    }

    #[test]
    fn test_small_motion_keeps_tracking() {
        let state = tracking_at(0.0, 0.0);
        let step = classify(&state, &RawEvent::moved(8.0, 0.0, 0.1), &Config::default());
        assert_eq!(step, Step::unchanged(state));
    }

    #[test]
    fn test_motion_past_move_threshold_starts_drag() {
        let step = classify(
            &tracking_at(0.0, 0.0),
            &RawEvent::dragged(ButtonId::Middle, 9.0, 0.0, 0.1),
            &Config::default(),
        );

        assert_eq!(step.next, GestureState::Dragging { start: Point::new(0.0, 0.0) });
        assert_eq!(step.timer, TimerCommand::Cancel);
        assert_eq!(step.disposition, Disposition::PassThrough);
    }

    #[test]
    fn test_drag_direction_and_inversion() {
        let dragging = GestureState::Dragging { start: Point::new(100.0, 0.0) };
        let right = RawEvent::dragged(ButtonId::Middle, 150.0, 0.0, 0.2);
        let left = RawEvent::dragged(ButtonId::Middle, 50.0, 0.0, 0.2);

        let config = Config::default();
        assert_eq!(classify(&dragging, &right, &config).actions.as_slice(), &[Action::MoveToNextSpace]);
        assert_eq!(
            classify(&dragging, &left, &config).actions.as_slice(),
            &[Action::MoveToPreviousSpace]
        );

        let inverted = Config { invert_drag_direction: true, ..Default::default() };
        assert_eq!(
            classify(&dragging, &right, &inverted).actions.as_slice(),
            &[Action::MoveToPreviousSpace]
        );
        assert_eq!(classify(&dragging, &left, &inverted).actions.as_slice(), &[Action::MoveToNextSpace]);
    }

    #[test]
    fn test_drag_at_threshold_stays_dragging() {
        let dragging = GestureState::Dragging { start: Point::new(0.0, 0.0) };
        let config = Config::default();

        for x in [-40.0, -12.5, 0.0, 39.9, 40.0] {
            let step = classify(&dragging, &RawEvent::moved(x, 300.0, 0.2), &config);
            assert_eq!(step.next, dragging, "dx {x}");
            assert!(step.actions.is_empty(), "dx {x}");
        }
    }

    #[test]
    fn test_drag_past_threshold_emits_exactly_one_action() {
        let dragging = GestureState::Dragging { start: Point::new(0.0, 0.0) };
        let config = Config::default();

        for x in [-400.0, -40.1, 40.1, 41.0, 1000.0] {
            let step = classify(&dragging, &RawEvent::moved(x, 0.0, 0.2), &config);
            assert_eq!(step.next, GestureState::Idle, "dx {x}");
            assert_eq!(step.actions.len(), 1, "dx {x}");
            assert!(step.disposition.is_consumed());
        }
    }

    #[test]
    fn test_space_navigation_disabled() {
        let config = Config { enable_space_navigation: false, ..Default::default() };
        let dragging = GestureState::Dragging { start: Point::new(0.0, 0.0) };
        let step = classify(&dragging, &RawEvent::moved(90.0, 0.0, 0.2), &config);

        assert_eq!(step.next, GestureState::Idle);
        assert!(step.actions.is_empty());
    }

    #[test]
    fn test_release_while_dragging_returns_to_idle() {
        let dragging = GestureState::Dragging { start: Point::new(0.0, 0.0) };
        let step = classify(
            &dragging,
            &RawEvent::button_up(ButtonId::Middle, 20.0, 0.0, 0.3),
            &Config::default(),
        );
        assert_eq!(step.next, GestureState::Idle);
        assert!(step.actions.is_empty());
    }

    #[test]
    fn test_control_click_drag_emits_scaled_scroll() {
        let config = Config::default();
        let down = RawEvent::button_down(ButtonId::Left, 10.0, 10.0, 0.0).with_modifiers(Modifiers::CONTROL);
        let step = classify(&GestureState::Idle, &down, &config);
        assert_eq!(step.next, GestureState::ScrollDragging { last_point: Point::new(10.0, 10.0) });
        assert_eq!(step.scroll_drag, ScrollDragSignal::Begin);

        let step = classify(&step.next, &RawEvent::dragged(ButtonId::Left, 20.0, 0.0, 0.1), &config);
        assert_eq!(step.next, GestureState::ScrollDragging { last_point: Point::new(20.0, 0.0) });
        let [Action::SyntheticScroll { dx, dy }] = step.actions.as_slice() else {
            panic!("expected one synthetic scroll, got {:?}", step.actions);
        };
        assert!((dx + 7.0).abs() < 1e-9);
        assert!((dy - 7.0).abs() < 1e-9);

        let step = classify(&step.next, &RawEvent::button_up(ButtonId::Left, 20.0, 0.0, 0.2), &config);
        assert_eq!(step.next, GestureState::Idle);
        assert_eq!(step.scroll_drag, ScrollDragSignal::End);
    }

    #[test]
    fn test_plain_left_click_passes_through() {
        let step = classify(
            &GestureState::Idle,
            &RawEvent::button_down(ButtonId::Left, 0.0, 0.0, 0.0),
            &Config::default(),
        );
        assert_eq!(step, Step::unchanged(GestureState::Idle));
    }

    #[test]
    fn test_awaiting_exit_closes_on_middle_down() {
        let step = classify(
            &GestureState::AwaitingExit,
            &RawEvent::button_down(ButtonId::Middle, 0.0, 0.0, 2.0),
            &Config::default(),
        );
        assert_eq!(step.next, GestureState::Idle);
        assert_eq!(step.actions.as_slice(), &[Action::ActivateMissionControlToggle]);
    }

    #[test]
    fn test_timeout_in_tracking() {
        let step = on_click_timeout(&tracking_at(0.0, 0.0), &Config::default()).unwrap();
        assert_eq!(step.next, GestureState::AwaitingExit);
        assert_eq!(step.actions.as_slice(), &[Action::ActivateMissionControlToggle]);

        let disabled = Config { enable_mission_control: false, ..Default::default() };
        let step = on_click_timeout(&tracking_at(0.0, 0.0), &disabled).unwrap();
        assert_eq!(step.next, GestureState::Idle);
        assert!(step.actions.is_empty());
    }

    #[test]
    fn test_timeout_outside_tracking_is_ignored() {
        let config = Config::default();
        assert!(on_click_timeout(&GestureState::Idle, &config).is_none());
        assert!(on_click_timeout(&GestureState::AwaitingExit, &config).is_none());
        let dragging = GestureState::Dragging { start: Point::new(0.0, 0.0) };
        assert!(on_click_timeout(&dragging, &config).is_none());
    }

    #[test]
    fn test_unmatched_events_pass_through() {
        let config = Config::default();
        let events = [
            RawEvent::moved(5.0, 5.0, 0.0),
            RawEvent::scroll(0.0, 1.0, false, 0.0),
            RawEvent::key_down(3, Modifiers::NONE, 0.0),
            RawEvent::button_up(ButtonId::Middle, 0.0, 0.0, 0.0),
            RawEvent::button_down(ButtonId::Other(7), 0.0, 0.0, 0.0),
        ];

        for event in &events {
            let step = classify(&GestureState::Idle, event, &config);
            assert_eq!(step, Step::unchanged(GestureState::Idle), "{event:?}");
        }
    }
}
