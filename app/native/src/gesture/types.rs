//! Event, action and state types for the gesture pipeline.
//!
//! Everything here is plain data: small `Copy` values that can cross the
//! event-callback boundary without allocation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Monotonic event time in seconds.
pub type Timestamp = f64;

/// Actions produced by one classification step.
///
/// Two inline slots cover every transition in the gesture table.
pub type ActionList = SmallVec<[Action; 2]>;

// ============================================================================
// Geometry & modifiers
// ============================================================================

/// Absolute pointer location in screen points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 { (self.x - other.x).hypot(self.y - other.y) }
}

/// Keyboard modifier flags held while an event was generated.
///
/// Bit values follow the macOS `CGEventFlags` masks so an event-tap adapter
/// can pass the raw flags straight through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers(u64);

impl Modifiers {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(0x0002_0000);
    pub const CONTROL: Self = Self(0x0004_0000);
    pub const OPTION: Self = Self(0x0008_0000);
    pub const COMMAND: Self = Self(0x0010_0000);

    /// Wraps raw `CGEventFlags`-style bits.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self { Self(bits) }

    #[must_use]
    pub const fn bits(self) -> u64 { self.0 }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool { self.0 & other.0 == other.0 }

    #[must_use]
    pub const fn union(self, other: Self) -> Self { Self(self.0 | other.0) }

    /// Returns whether the control key is held.
    #[must_use]
    pub const fn control(self) -> bool { self.contains(Self::CONTROL) }
}

// ============================================================================
// Buttons
// ============================================================================

/// Semantic identity of a pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ButtonId {
    /// Primary button.
    Left,
    /// Wheel button.
    Middle,
    /// Side button that navigates back.
    LateralBack,
    /// Side button that navigates forward.
    LateralForward,
    /// Any other hardware button, by raw number.
    Other(u32),
}

impl ButtonId {
    /// Returns whether this is one of the side navigation buttons.
    #[must_use]
    pub const fn is_lateral(self) -> bool { matches!(self, Self::LateralBack | Self::LateralForward) }

    /// The navigation action bound to a lateral button.
    #[must_use]
    pub const fn navigation_action(self) -> Option<Action> {
        match self {
            Self::LateralBack => Some(Action::NavigateBack),
            Self::LateralForward => Some(Action::NavigateForward),
            _ => None,
        }
    }
}

/// Direction of a button state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Down,
    Up,
}

// ============================================================================
// Raw events
// ============================================================================

/// Scroll-wheel delta in both axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollDelta {
    pub delta_x: f64,
    pub delta_y: f64,
}

impl ScrollDelta {
    #[must_use]
    pub const fn new(delta_x: f64, delta_y: f64) -> Self { Self { delta_x, delta_y } }

    /// The delta with both axes negated.
    #[must_use]
    pub fn inverted(self) -> Self { Self::new(-self.delta_x, -self.delta_y) }
}

/// Kind-specific payload of a [`RawEvent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    ButtonDown(ButtonId),
    ButtonUp(ButtonId),
    PointerMoved,
    PointerDragged(ButtonId),
    ScrollTick {
        delta: ScrollDelta,
        /// Set for trackpad-style continuous or momentum scrolling.
        continuous: bool,
    },
    KeyDown {
        key_code: u16,
    },
}

/// One pointer, button, scroll or key event as delivered by the event source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawEvent {
    pub kind: EventKind,
    pub timestamp: Timestamp,
    pub location: Point,
    pub modifiers: Modifiers,
}

impl RawEvent {
    #[must_use]
    pub const fn new(kind: EventKind, timestamp: Timestamp, location: Point) -> Self {
        Self { kind, timestamp, location, modifiers: Modifiers::NONE }
    }

    #[must_use]
    pub const fn button_down(button: ButtonId, x: f64, y: f64, timestamp: Timestamp) -> Self {
        Self::new(EventKind::ButtonDown(button), timestamp, Point::new(x, y))
    }

    #[must_use]
    pub const fn button_up(button: ButtonId, x: f64, y: f64, timestamp: Timestamp) -> Self {
        Self::new(EventKind::ButtonUp(button), timestamp, Point::new(x, y))
    }

    #[must_use]
    pub const fn moved(x: f64, y: f64, timestamp: Timestamp) -> Self {
        Self::new(EventKind::PointerMoved, timestamp, Point::new(x, y))
    }

    #[must_use]
    pub const fn dragged(button: ButtonId, x: f64, y: f64, timestamp: Timestamp) -> Self {
        Self::new(EventKind::PointerDragged(button), timestamp, Point::new(x, y))
    }

    #[must_use]
    pub const fn scroll(delta_x: f64, delta_y: f64, continuous: bool, timestamp: Timestamp) -> Self {
        Self::new(
            EventKind::ScrollTick { delta: ScrollDelta::new(delta_x, delta_y), continuous },
            timestamp,
            Point::new(0.0, 0.0),
        )
    }

    #[must_use]
    pub const fn key_down(key_code: u16, modifiers: Modifiers, timestamp: Timestamp) -> Self {
        Self::new(EventKind::KeyDown { key_code }, timestamp, Point::new(0.0, 0.0))
            .with_modifiers(modifiers)
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub const fn at(mut self, location: Point) -> Self {
        self.location = location;
        self
    }

    /// The button transition carried by this event, if any.
    #[must_use]
    pub const fn transition(&self) -> Option<(ButtonId, Transition)> {
        match self.kind {
            EventKind::ButtonDown(button) => Some((button, Transition::Down)),
            EventKind::ButtonUp(button) => Some((button, Transition::Up)),
            _ => None,
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// Semantic actions executed by the [`crate::dispatch::ActionDispatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    MoveToNextSpace,
    MoveToPreviousSpace,
    ActivateMissionControlToggle,
    ZoomIn,
    ZoomOut,
    NavigateBack,
    NavigateForward,
    SyntheticScroll { dx: f64, dy: f64 },
}

impl Action {
    /// Short stable name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MoveToNextSpace => "move-to-next-space",
            Self::MoveToPreviousSpace => "move-to-previous-space",
            Self::ActivateMissionControlToggle => "mission-control-toggle",
            Self::ZoomIn => "zoom-in",
            Self::ZoomOut => "zoom-out",
            Self::NavigateBack => "navigate-back",
            Self::NavigateForward => "navigate-forward",
            Self::SyntheticScroll { .. } => "synthetic-scroll",
        }
    }
}

/// Verdict for a single event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Disposition {
    /// Deliver the event unchanged.
    PassThrough,
    /// Deliver the event with a rewritten scroll delta.
    PassThroughModified(ScrollDelta),
    /// Swallow the event.
    Consume,
}

impl Disposition {
    #[must_use]
    pub const fn is_consumed(&self) -> bool { matches!(self, Self::Consume) }
}

/// A disposition plus the actions to dispatch for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub disposition: Disposition,
    pub actions: ActionList,
}

impl Classification {
    #[must_use]
    pub const fn pass_through() -> Self {
        Self { disposition: Disposition::PassThrough, actions: SmallVec::new_const() }
    }

    #[must_use]
    pub const fn modified(delta: ScrollDelta) -> Self {
        Self { disposition: Disposition::PassThroughModified(delta), actions: SmallVec::new_const() }
    }

    #[must_use]
    pub const fn consume() -> Self {
        Self { disposition: Disposition::Consume, actions: SmallVec::new_const() }
    }

    #[must_use]
    pub fn consume_with(action: Action) -> Self {
        let mut actions = ActionList::new();
        actions.push(action);
        Self { disposition: Disposition::Consume, actions }
    }
}

// ============================================================================
// Gesture state
// ============================================================================

/// State of the middle-button / control-drag gesture machine.
///
/// Each variant carries only the data its state needs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    /// Middle button held, click-vs-drag not yet decided.
    Tracking { start: Point, armed_at: Timestamp },
    /// Middle button dragged past the move threshold.
    Dragging { start: Point },
    /// Control + left button drag emitting synthetic scroll.
    ScrollDragging { last_point: Point },
    /// Mission Control opened by a hold, waiting for the closing press.
    AwaitingExit,
}

impl GestureState {
    /// Short stable name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Tracking { .. } => "tracking",
            Self::Dragging { .. } => "dragging",
            Self::ScrollDragging { .. } => "scroll-dragging",
            Self::AwaitingExit => "awaiting-exit",
        }
    }
}
