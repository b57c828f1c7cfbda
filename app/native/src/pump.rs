//! Event pump: the single entry point of the classification core.
//!
//! Every event goes through one pipeline, in order:
//!
//! 1. Lateral button transitions are debounced and owned by the pump: every
//!    Down/Up is consumed, and an accepted Up emits its navigation action.
//! 2. Scroll ticks go to the [`ScrollProcessor`].
//! 3. Everything else goes to the [`GestureStateMachine`].
//!
//! The first stage that claims an event decides its disposition. Unclaimed
//! events pass through unmodified.
//!
//! # Concurrency
//!
//! The three components live in one engine behind a single mutex, shared
//! by the event callback and the click-timeout callback. The lock is held only
//! for the classification step itself; timers are scheduled and actions are
//! dispatched after it is released, so a scheduler or dispatcher that calls
//! back synchronously cannot deadlock.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::config::{Config, ConfigSource, SharedConfig};
use crate::dispatch::ActionDispatcher;
use crate::gesture::{
    ButtonDebounceState, ButtonId, Classification, DebounceFilter, Disposition, EventKind,
    GestureState, GestureStateMachine, RawEvent, ScrollDragSignal, ScrollProcessor, TimerRequest,
    Transition, Verdict,
};
use crate::source::EventSink;
use crate::timer::TimerScheduler;

/// Classification entry points exposed to the embedding application.
pub trait Classifier {
    /// Classifies `event`, dispatches its actions and returns its disposition.
    fn on_event(&self, event: &RawEvent) -> Disposition;

    /// Forces every component back to its initial state.
    fn reset_state(&self);

    /// Hot-swaps the configuration without touching in-flight gesture state.
    fn configure(&self, config: Config);
}

/// Mutable classification state guarded by the pump's mutex.
#[derive(Debug, Default)]
struct Engine {
    debounce: DebounceFilter,
    gestures: GestureStateMachine,
    scroll: ScrollProcessor,
}

impl Engine {
    fn classify(
        &mut self,
        event: &RawEvent,
        config: &Config,
    ) -> (Classification, Option<TimerRequest>) {
        if let Some((button, transition)) = event.transition()
            && self.owns(button, config)
        {
            let verdict = self.debounce.filter(button, transition, event.timestamp, config);
            let classification = match (verdict, transition, button.navigation_action()) {
                (Verdict::Allow, Transition::Up, Some(action)) => Classification::consume_with(action),
                _ => Classification::consume(),
            };
            return (classification, None);
        }

        match event.kind {
            EventKind::PointerDragged(button) if self.owns(button, config) => {
                // Press-drag-release of a side button never navigates.
                self.debounce.cancel_pending(button);
                (Classification::consume(), None)
            }
            EventKind::ScrollTick { delta, continuous } => {
                (self.scroll.process(event, delta, continuous, config), None)
            }
            _ => {
                let outcome = self.gestures.handle(event, config);
                match outcome.scroll_drag {
                    ScrollDragSignal::Begin => self.scroll.begin_control_drag(event.timestamp),
                    ScrollDragSignal::End => self.scroll.end_control_drag(),
                    ScrollDragSignal::None => {}
                }
                let classification =
                    Classification { disposition: outcome.disposition, actions: outcome.actions };
                (classification, outcome.timer)
            }
        }
    }

    /// Lateral buttons belong to the debounce stage while navigation is enabled.
    fn owns(&self, button: ButtonId, config: &Config) -> bool {
        config.enable_button_navigation && self.debounce.is_tracked(button)
    }

    fn reset(&mut self) {
        self.debounce.reset();
        self.gestures.reset();
        self.scroll.reset();
    }
}

/// Event pump wiring the classification core to its collaborators.
pub struct EventPump {
    engine: Arc<Mutex<Engine>>,
    config: Arc<SharedConfig>,
    dispatcher: Arc<dyn ActionDispatcher>,
    timer: Arc<dyn TimerScheduler>,
}

impl EventPump {
    /// Creates a pump over a private configuration.
    #[must_use]
    pub fn new(
        config: Config,
        dispatcher: Arc<dyn ActionDispatcher>,
        timer: Arc<dyn TimerScheduler>,
    ) -> Self {
        Self::with_shared_config(Arc::new(SharedConfig::new(config)), dispatcher, timer)
    }

    /// Creates a pump reading `config`, which may be swapped by its other owners.
    #[must_use]
    pub fn with_shared_config(
        config: Arc<SharedConfig>,
        dispatcher: Arc<dyn ActionDispatcher>,
        timer: Arc<dyn TimerScheduler>,
    ) -> Self {
        Self { engine: Arc::new(Mutex::new(Engine::default())), config, dispatcher, timer }
    }

    /// Classifies `event` without dispatching its actions.
    ///
    /// Timers requested by the step are still scheduled.
    pub fn classify(&self, event: &RawEvent) -> Classification {
        let config = self.config.snapshot();
        let (classification, timer) = self.engine.lock().classify(event, &config);

        if let Some(request) = timer {
            self.arm_click_timeout(request);
        }

        tracing::trace!(
            kind = ?event.kind,
            disposition = ?classification.disposition,
            actions = classification.actions.len(),
            "classified"
        );
        classification
    }

    /// Current configuration snapshot.
    #[must_use]
    pub fn config(&self) -> Arc<Config> { self.config.snapshot() }

    /// The shared configuration this pump reads.
    #[must_use]
    pub const fn shared_config(&self) -> &Arc<SharedConfig> { &self.config }

    #[must_use]
    pub fn state(&self) -> GestureState { self.engine.lock().gestures.state() }

    #[must_use]
    pub fn zoom_accumulator(&self) -> f64 { self.engine.lock().scroll.accumulator() }

    #[must_use]
    pub fn debounce_state(&self, button: ButtonId) -> Option<ButtonDebounceState> {
        self.engine.lock().debounce.state(button)
    }

    /// Maps a raw hardware button number through the configured button map.
    #[must_use]
    pub fn resolve_button(&self, raw: u32) -> ButtonId { self.config.snapshot().buttons.resolve(raw) }

    fn arm_click_timeout(&self, request: TimerRequest) {
        let engine: Weak<Mutex<Engine>> = Arc::downgrade(&self.engine);
        let config = Arc::clone(&self.config);
        let dispatcher = Arc::clone(&self.dispatcher);

        tracing::debug!(epoch = request.epoch, delay = ?request.delay, "arming click timeout");
        let handle = self.timer.schedule(
            request.delay,
            Box::new(move || {
                let Some(engine) = engine.upgrade() else {
                    return;
                };
                let actions = engine.lock().gestures.on_timeout(request.epoch, &config.snapshot());
                for action in actions {
                    dispatcher.dispatch(action);
                }
            }),
        );

        self.engine.lock().gestures.attach_timer(request.epoch, handle);
    }
}

impl Classifier for EventPump {
    fn on_event(&self, event: &RawEvent) -> Disposition {
        let Classification { disposition, actions } = self.classify(event);
        for action in actions {
            self.dispatcher.dispatch(action);
        }
        disposition
    }

    fn reset_state(&self) {
        tracing::debug!("resetting classifier state");
        self.engine.lock().reset();
    }

    fn configure(&self, config: Config) {
        self.config.replace(config);
        tracing::info!("classifier configuration updated");
    }
}

impl EventSink for EventPump {
    fn on_event(&self, event: &RawEvent) -> Disposition { Classifier::on_event(self, event) }

    fn on_context_changed(&self) {
        tracing::info!("context changed, resetting gesture state");
        self.reset_state();
    }
}
