//! Configuration types for Mouseflow.
//!
//! This module provides the configuration types and loading functionality.
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::{defaults, limits};
use crate::gesture::ButtonId;
use crate::source::EventInterest;

/// How the zoom accumulator is reset after it crosses the threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ZoomResetPolicy {
    /// Drop the accumulated value entirely.
    #[default]
    Zero,
    /// Keep the signed remainder past the threshold.
    CarryRemainder,
}

/// Mapping from raw hardware button numbers to semantic buttons.
///
/// Unmapped numbers resolve to [`ButtonId::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ButtonMap(BTreeMap<u32, ButtonId>);

impl Default for ButtonMap {
    fn default() -> Self {
        Self(BTreeMap::from([
            (0, ButtonId::Left),
            (2, ButtonId::Middle),
            (3, ButtonId::LateralBack),
            (4, ButtonId::LateralForward),
        ]))
    }
}

impl ButtonMap {
    /// Resolves a raw hardware button number.
    #[must_use]
    pub fn resolve(&self, raw: u32) -> ButtonId {
        self.0.get(&raw).copied().unwrap_or(ButtonId::Other(raw))
    }

    /// Binds `raw` to `button`, replacing any previous binding.
    #[must_use]
    pub fn with(mut self, raw: u32, button: ButtonId) -> Self {
        self.0.insert(raw, button);
        self
    }
}

/// Gesture configuration snapshot.
///
/// Durations are in seconds, distances in screen points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Horizontal travel needed while dragging with the middle button to switch spaces.
    /// Default: 40
    pub drag_threshold_px: f64,

    /// Accumulated vertical scroll needed for one zoom step.
    /// Default: 2.0
    pub zoom_threshold: f64,

    /// Swap the space-switch direction.
    /// Default: false
    pub invert_drag_direction: bool,

    /// Invert discrete scroll-wheel deltas. Continuous (trackpad) scrolling is never inverted.
    /// Default: false
    pub invert_scroll: bool,

    /// Control + scroll emits zoom steps.
    /// Default: false
    pub enable_scroll_zoom: bool,

    /// Middle click toggles Mission Control.
    /// Default: true
    pub enable_mission_control: bool,

    /// Middle-button drag switches spaces.
    /// Default: true
    pub enable_space_navigation: bool,

    /// Lateral buttons navigate back and forward.
    /// Default: true
    pub enable_button_navigation: bool,

    /// How long a middle-button press may be held before it counts as a hold.
    /// Default: 0.5
    pub click_timeout_sec: f64,

    /// Minimum time between accepted lateral-button actions.
    /// Default: 0.1
    pub debounce_interval_sec: f64,

    /// Shortest lateral-button press accepted as a click.
    /// Default: 0.01
    pub min_click_duration_sec: f64,

    /// Longest lateral-button press accepted as a click.
    /// Default: 1.0
    pub max_click_duration_sec: f64,

    /// Window in which repeated hardware transitions count as duplicates.
    /// Default: 0.05
    pub event_cluster_threshold_sec: f64,

    /// Zoom accumulator reset behaviour.
    /// Default: `"zero"`
    pub zoom_reset_policy: ZoomResetPolicy,

    /// Raw button number to semantic button mapping.
    /// Default: `{"0": "left", "2": "middle", "3": "lateralBack", "4": "lateralForward"}`
    pub buttons: ButtonMap,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            drag_threshold_px: defaults::DRAG_THRESHOLD_PX,
            zoom_threshold: defaults::ZOOM_THRESHOLD,
            invert_drag_direction: false,
            invert_scroll: false,
            enable_scroll_zoom: false,
            enable_mission_control: true,
            enable_space_navigation: true,
            enable_button_navigation: true,
            click_timeout_sec: defaults::CLICK_TIMEOUT_SECS,
            debounce_interval_sec: defaults::DEBOUNCE_INTERVAL_SECS,
            min_click_duration_sec: defaults::MIN_CLICK_DURATION_SECS,
            max_click_duration_sec: defaults::MAX_CLICK_DURATION_SECS,
            event_cluster_threshold_sec: defaults::EVENT_CLUSTER_THRESHOLD_SECS,
            zoom_reset_policy: ZoomResetPolicy::Zero,
            buttons: ButtonMap::default(),
        }
    }
}

impl Config {
    /// Returns a copy with every value inside its accepted range.
    ///
    /// Thresholds are floored at their minimums, durations that are negative or
    /// not finite fall back to the defaults, and the click duration bounds are
    /// put in order.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.drag_threshold_px =
            floor_or(self.drag_threshold_px, limits::MIN_DRAG_THRESHOLD_PX, defaults::DRAG_THRESHOLD_PX);
        self.zoom_threshold =
            floor_or(self.zoom_threshold, limits::MIN_ZOOM_THRESHOLD, defaults::ZOOM_THRESHOLD);
        self.click_timeout_sec = duration_or(self.click_timeout_sec, defaults::CLICK_TIMEOUT_SECS);
        self.debounce_interval_sec =
            duration_or(self.debounce_interval_sec, defaults::DEBOUNCE_INTERVAL_SECS);
        self.min_click_duration_sec =
            duration_or(self.min_click_duration_sec, defaults::MIN_CLICK_DURATION_SECS);
        self.max_click_duration_sec =
            duration_or(self.max_click_duration_sec, defaults::MAX_CLICK_DURATION_SECS);
        self.event_cluster_threshold_sec =
            duration_or(self.event_cluster_threshold_sec, defaults::EVENT_CLUSTER_THRESHOLD_SECS);

        if self.min_click_duration_sec > self.max_click_duration_sec {
            std::mem::swap(&mut self.min_click_duration_sec, &mut self.max_click_duration_sec);
        }

        self
    }

    /// The click timeout as a [`Duration`].
    #[must_use]
    pub fn click_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.click_timeout_sec)
            .unwrap_or_else(|_| Duration::from_secs_f64(defaults::CLICK_TIMEOUT_SECS))
    }

    /// Returns whether switching to `other` changes which event types must be tapped.
    ///
    /// Callers restart monitoring (and therefore reset gesture state) when it does.
    #[must_use]
    pub fn affects_subscription(&self, other: &Self) -> bool {
        EventInterest::from_config(self) != EventInterest::from_config(other)
    }
}

fn floor_or(value: f64, floor: f64, fallback: f64) -> f64 {
    if value.is_finite() { value.max(floor) } else { fallback }
}

fn duration_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value >= 0.0 { value } else { fallback }
}

/// Errors that can occur when loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/mouseflow/config.jsonc, \
         ~/Library/Application Support/mouseflow/config.jsonc, or ~/.mouseflow.jsonc"
    )]
    NotFound,
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Home-directory configuration file names.
const HOME_CONFIG_FILE_NAMES: &[&str] = &[".mouseflow.jsonc", ".mouseflow.json"];

/// Returns the possible configuration file paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/mouseflow/config.jsonc` or `config.json`
/// 2. `~/.config/mouseflow/config.jsonc` or `config.json`
/// 3. `~/Library/Application Support/mouseflow/config.jsonc` or `config.json`
/// 4. `~/.mouseflow.jsonc` or `~/.mouseflow.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    let mut push_dir = |dir: PathBuf| {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    };

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        push_dir(PathBuf::from(xdg_config).join("mouseflow"));
    }

    if let Some(home) = dirs::home_dir() {
        push_dir(home.join(".config").join("mouseflow"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        push_dir(config_dir.join("mouseflow"));
    }

    if let Some(home) = dirs::home_dir() {
        for filename in HOME_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of the expected locations.
/// Returns `ConfigError::Io` if a configuration file exists but could not be read.
/// Returns `ConfigError::Parse` if the configuration file contains invalid JSON.
pub fn load_config() -> Result<(Config, PathBuf), ConfigError> {
    config_paths()
        .into_iter()
        .find(|path| path.exists())
        .map_or(Err(ConfigError::NotFound), |path| load_config_from_path(&path))
}

/// Loads and sanitizes the configuration at `path`.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if `path` does not exist, `ConfigError::Io`
/// if it cannot be read and `ConfigError::Parse` if it is not valid JSONC.
pub fn load_config_from_path(path: &Path) -> Result<(Config, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    let reader = json_comments::StripComments::new(file);
    let config: Config = serde_json::from_reader(reader)?;

    Ok((config.sanitized(), path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert!((config.drag_threshold_px - 40.0).abs() < f64::EPSILON);
        assert!((config.zoom_threshold - 2.0).abs() < f64::EPSILON);
        assert!(config.enable_mission_control);
        assert!(config.enable_space_navigation);
        assert!(!config.invert_scroll);
        assert!(!config.enable_scroll_zoom);
        assert_eq!(config.zoom_reset_policy, ZoomResetPolicy::Zero);
    }

    #[test]
    fn test_deserialize_partial_json_uses_defaults() {
        let json = r#"{"dragThresholdPx": 60, "invertScroll": true}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!((config.drag_threshold_px - 60.0).abs() < f64::EPSILON);
        assert!(config.invert_scroll);
        assert!((config.debounce_interval_sec - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sanitized_applies_floors() {
        let config = Config {
            drag_threshold_px: 1.0,
            zoom_threshold: 0.1,
            ..Default::default()
        }
        .sanitized();
        assert!((config.drag_threshold_px - 5.0).abs() < f64::EPSILON);
        assert!((config.zoom_threshold - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sanitized_repairs_bad_durations() {
        let config = Config {
            click_timeout_sec: f64::NAN,
            debounce_interval_sec: -1.0,
            min_click_duration_sec: 2.0,
            max_click_duration_sec: 0.5,
            zoom_threshold: f64::INFINITY,
            ..Default::default()
        }
        .sanitized();
        assert!((config.click_timeout_sec - 0.5).abs() < f64::EPSILON);
        assert!((config.debounce_interval_sec - 0.1).abs() < f64::EPSILON);
        assert!((config.min_click_duration_sec - 0.5).abs() < f64::EPSILON);
        assert!((config.max_click_duration_sec - 2.0).abs() < f64::EPSILON);
        assert!((config.zoom_threshold - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_click_timeout_duration() {
        let config = Config { click_timeout_sec: 0.25, ..Default::default() };
        assert_eq!(config.click_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_button_map_defaults_and_fallback() {
        let map = ButtonMap::default();
        assert_eq!(map.resolve(2), ButtonId::Middle);
        assert_eq!(map.resolve(3), ButtonId::LateralBack);
        assert_eq!(map.resolve(4), ButtonId::LateralForward);
        assert_eq!(map.resolve(9), ButtonId::Other(9));

        let swapped = map.with(3, ButtonId::LateralForward).with(4, ButtonId::LateralBack);
        assert_eq!(swapped.resolve(3), ButtonId::LateralForward);
    }

    #[test]
    fn test_button_map_deserializes_from_object() {
        let json = r#"{"buttons": {"2": "middle", "5": "lateralBack"}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.buttons.resolve(5), ButtonId::LateralBack);
        assert_eq!(config.buttons.resolve(3), ButtonId::Other(3));
    }

    #[test]
    fn test_zoom_reset_policy_deserializes() {
        let json = r#"{"zoomResetPolicy": "carryRemainder"}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.zoom_reset_policy, ZoomResetPolicy::CarryRemainder);
    }

    #[test]
    fn test_affects_subscription_only_for_scroll_toggles() {
        let base = Config::default();

        let thresholds = Config { drag_threshold_px: 80.0, ..Default::default() };
        assert!(!base.affects_subscription(&thresholds));

        let inverted = Config { invert_scroll: true, ..Default::default() };
        assert!(base.affects_subscription(&inverted));

        let zoom = Config { enable_scroll_zoom: true, ..Default::default() };
        assert!(base.affects_subscription(&zoom));
        assert!(!inverted.affects_subscription(&zoom));
    }

    #[test]
    fn test_load_config_from_jsonc_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
                // comments are allowed
                "zoomThreshold": 0.2, /* floored to 0.5 */
                "enableScrollZoom": true
            }}"#
        )
        .unwrap();

        let (config, path) = load_config_from_path(file.path()).unwrap();
        assert_eq!(path, file.path());
        assert!(config.enable_scroll_zoom);
        assert!((config.zoom_threshold - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_config_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_from_path(&dir.path().join("missing.jsonc"));
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn test_load_config_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{ not json").unwrap();
        let result = load_config_from_path(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_paths_are_not_empty() {
        let paths = config_paths();
        assert!(!paths.is_empty() || std::env::var("HOME").is_err());
    }

    #[test]
    fn test_config_error_message() {
        let msg = ConfigError::NotFound.to_string();
        assert!(msg.contains("No configuration file found"));
    }
}
