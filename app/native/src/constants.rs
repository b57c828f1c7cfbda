//! Internal constants for gesture classification tuning.
//!
//! This module centralizes the fixed thresholds used by the classification
//! core. User-tunable values live in [`crate::config::Config`]; the values here
//! are the ones the gesture table depends on structurally.
//!
//! # Organization
//!
//! - `gesture` - Pointer distance thresholds for the middle-button state machine
//! - `scroll` - Scroll-drag scaling and zoom suppression
//! - `defaults` - Default values for [`crate::config::Config`]
//! - `limits` - Floors applied when sanitizing configuration

/// Pointer distance thresholds for the middle-button gesture.
pub mod gesture {
    /// Maximum pointer travel (points) for a middle-button press to count as a click.
    pub const CLICK_DISTANCE_PX: f64 = 5.0;

    /// Pointer travel (points) after which a tracked press becomes a drag.
    ///
    /// Must stay above [`CLICK_DISTANCE_PX`] so a stationary click is never
    /// read as a drag.
    pub const MOVE_THRESHOLD_PX: f64 = 8.0;
}

/// Scroll-related constants.
pub mod scroll {
    /// Scale applied to pointer deltas while control-click scroll-dragging.
    pub const SCROLL_DRAG_SCALE: f64 = 0.7;

    /// Seconds after a control-click drag starts during which zoom is ignored.
    pub const ZOOM_SUPPRESSION_SECS: f64 = 0.2;
}

/// Default values for the user configuration.
pub mod defaults {
    /// Horizontal travel (points) needed to switch spaces.
    pub const DRAG_THRESHOLD_PX: f64 = 40.0;

    /// Accumulated vertical scroll needed to emit one zoom step.
    pub const ZOOM_THRESHOLD: f64 = 2.0;

    /// Seconds a middle-button press may be held before it counts as a hold.
    pub const CLICK_TIMEOUT_SECS: f64 = 0.5;

    /// Minimum seconds between two accepted lateral-button actions.
    pub const DEBOUNCE_INTERVAL_SECS: f64 = 0.1;

    /// Shortest lateral-button press accepted as a click.
    pub const MIN_CLICK_DURATION_SECS: f64 = 0.01;

    /// Longest lateral-button press accepted as a click.
    pub const MAX_CLICK_DURATION_SECS: f64 = 1.0;

    /// Window in which repeated hardware transitions are treated as duplicates.
    pub const EVENT_CLUSTER_THRESHOLD_SECS: f64 = 0.05;
}

/// Floors applied by [`crate::config::Config::sanitized`].
pub mod limits {
    /// Smallest accepted drag threshold (points).
    pub const MIN_DRAG_THRESHOLD_PX: f64 = 5.0;

    /// Smallest accepted zoom threshold.
    pub const MIN_ZOOM_THRESHOLD: f64 = 0.5;
}
