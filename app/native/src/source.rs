//! Event source seam and monitoring session.
//!
//! The platform adapter (an event tap, a hook, a replay file) implements
//! [`EventSource`] and pushes every [`RawEvent`] into an [`EventSink`]
//! synchronously on its callback thread. [`Monitor`] ties a source to an
//! [`EventPump`] and owns the session lifecycle: which event types are
//! subscribed, when gesture state is reset and when the source is restarted.

use std::fmt;
use std::sync::Arc;

use crate::config::Config;
use crate::error::MouseflowError;
use crate::gesture::{Disposition, EventKind, RawEvent};
use crate::pump::{Classifier, EventPump};

// ============================================================================
// Event interest
// ============================================================================

/// Bit mask of the event types a session subscribes to.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EventInterest(u32);

impl EventInterest {
    pub const BUTTON_DOWN: Self = Self(1 << 0);
    pub const BUTTON_UP: Self = Self(1 << 1);
    pub const POINTER_MOVED: Self = Self(1 << 2);
    pub const POINTER_DRAGGED: Self = Self(1 << 3);
    pub const SCROLL: Self = Self(1 << 4);
    pub const KEY_DOWN: Self = Self(1 << 5);

    /// Button and pointer events, always tapped.
    pub const POINTER: Self = Self(
        Self::BUTTON_DOWN.0 | Self::BUTTON_UP.0 | Self::POINTER_MOVED.0 | Self::POINTER_DRAGGED.0,
    );

    /// Interest required by `config`.
    ///
    /// Scroll events are only tapped when something rewrites or consumes them.
    #[must_use]
    pub const fn from_config(config: &Config) -> Self {
        if config.invert_scroll || config.enable_scroll_zoom {
            Self::POINTER.union(Self::SCROLL)
        } else {
            Self::POINTER
        }
    }

    #[must_use]
    pub const fn bits(self) -> u32 { self.0 }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool { self.0 & other.0 == other.0 }

    #[must_use]
    pub const fn union(self, other: Self) -> Self { Self(self.0 | other.0) }

    /// Returns whether `event` belongs to a subscribed type.
    #[must_use]
    pub const fn admits(self, event: &RawEvent) -> bool {
        let kind = match event.kind {
            EventKind::ButtonDown(_) => Self::BUTTON_DOWN,
            EventKind::ButtonUp(_) => Self::BUTTON_UP,
            EventKind::PointerMoved => Self::POINTER_MOVED,
            EventKind::PointerDragged(_) => Self::POINTER_DRAGGED,
            EventKind::ScrollTick { .. } => Self::SCROLL,
            EventKind::KeyDown { .. } => Self::KEY_DOWN,
        };
        self.contains(kind)
    }
}

impl fmt::Debug for EventInterest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(EventInterest, &str); 6] = [
            (EventInterest::BUTTON_DOWN, "button-down"),
            (EventInterest::BUTTON_UP, "button-up"),
            (EventInterest::POINTER_MOVED, "pointer-moved"),
            (EventInterest::POINTER_DRAGGED, "pointer-dragged"),
            (EventInterest::SCROLL, "scroll"),
            (EventInterest::KEY_DOWN, "key-down"),
        ];

        f.debug_set()
            .entries(NAMES.iter().filter(|(bit, _)| self.contains(*bit)).map(|(_, name)| name))
            .finish()
    }
}

// ============================================================================
// Seams
// ============================================================================

/// Receiver of the raw event stream.
pub trait EventSink: Send + Sync {
    /// Classifies one event and returns its disposition. Must not block.
    fn on_event(&self, event: &RawEvent) -> Disposition;

    /// The OS switched context (e.g. virtual desktop) and in-flight gestures are void.
    fn on_context_changed(&self);
}

/// Platform event interception point.
pub trait EventSource {
    /// Starts delivering events matching `interest` to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`MouseflowError::EventSource`] if the interception point cannot
    /// be installed (missing permission, unsupported platform).
    fn start(&mut self, interest: EventInterest, sink: Arc<dyn EventSink>)
    -> Result<(), MouseflowError>;

    /// Stops delivering events. Idempotent.
    fn stop(&mut self);
}

// ============================================================================
// Monitor
// ============================================================================

/// A monitoring session over one event source.
pub struct Monitor<S: EventSource> {
    source: S,
    pump: Arc<EventPump>,
    interest: EventInterest,
    running: bool,
}

impl<S: EventSource> Monitor<S> {
    #[must_use]
    pub fn new(source: S, pump: Arc<EventPump>) -> Self {
        let interest = EventInterest::from_config(&pump.config());
        Self { source, pump, interest, running: false }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool { self.running }

    /// The interest the session is (or would be) subscribed with.
    #[must_use]
    pub const fn interest(&self) -> EventInterest { self.interest }

    #[must_use]
    pub const fn pump(&self) -> &Arc<EventPump> { &self.pump }

    #[must_use]
    pub const fn source(&self) -> &S { &self.source }

    /// Resets gesture state and starts the source. A no-op when already running.
    ///
    /// # Errors
    ///
    /// Returns the source's error if it cannot start.
    pub fn start(&mut self) -> Result<(), MouseflowError> {
        if self.running {
            return Ok(());
        }

        self.pump.reset_state();
        self.interest = EventInterest::from_config(&self.pump.config());

        let sink: Arc<dyn EventSink> = Arc::clone(&self.pump) as Arc<dyn EventSink>;
        self.source.start(self.interest, sink).inspect_err(|err| {
            tracing::error!(error = %err, "failed to start event source");
        })?;

        self.running = true;
        tracing::info!(interest = ?self.interest, "monitoring started");
        Ok(())
    }

    /// Stops the source and resets gesture state. A no-op when not running.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }

        self.source.stop();
        self.pump.reset_state();
        self.running = false;
        tracing::info!("monitoring stopped");
    }

    /// Stops and starts again, resetting all gesture state.
    ///
    /// # Errors
    ///
    /// Returns the source's error if it cannot start.
    pub fn restart(&mut self) -> Result<(), MouseflowError> {
        tracing::info!("restarting monitoring");
        self.stop();
        self.start()
    }

    /// Hot-swaps the configuration.
    ///
    /// In-flight gestures survive unless the new configuration changes the
    /// subscribed event types, in which case a running session is restarted.
    ///
    /// # Errors
    ///
    /// Returns the source's error if a required restart fails.
    pub fn apply_config(&mut self, config: Config) -> Result<(), MouseflowError> {
        let resubscribe = self.pump.config().affects_subscription(&config);
        self.pump.configure(config);

        if !resubscribe {
            return Ok(());
        }

        tracing::debug!("configuration changes subscribed events");
        if self.running {
            self.restart()
        } else {
            self.interest = EventInterest::from_config(&self.pump.config());
            Ok(())
        }
    }

    /// Forwards an OS context change (e.g. a space switch) to the pump.
    pub fn on_context_changed(&self) { self.pump.on_context_changed(); }
}

impl<S: EventSource> Drop for Monitor<S> {
    fn drop(&mut self) { self.stop(); }
}
