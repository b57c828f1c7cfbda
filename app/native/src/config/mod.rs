//! Configuration module for Mouseflow.
//!
//! This module provides the configuration types, loading functionality, the
//! [`ConfigSource`] seam read by the classifier on every event, and file
//! watching for hot-reloading configuration changes.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

pub mod types;
mod watcher;

use std::sync::Arc;

use parking_lot::RwLock;
pub use types::{
    ButtonMap, Config, ConfigError, ZoomResetPolicy, config_paths, load_config,
    load_config_from_path,
};
pub use watcher::watch_config_file;

/// Supplies the configuration snapshot used for one classification step.
///
/// Implementations must make `snapshot` cheap: it is called at the start of
/// every event on the event-callback thread.
pub trait ConfigSource: Send + Sync {
    /// Returns the current configuration.
    fn snapshot(&self) -> Arc<Config>;
}

/// Hot-swappable configuration shared between the classifier and its owner.
///
/// Reads clone an `Arc`; writes replace it. Neither holds the lock for longer
/// than a pointer copy.
#[derive(Debug, Default)]
pub struct SharedConfig {
    current: RwLock<Arc<Config>>,
}

impl SharedConfig {
    /// Creates a shared configuration holding `config` (sanitized).
    #[must_use]
    pub fn new(config: Config) -> Self { Self { current: RwLock::new(Arc::new(config.sanitized())) } }

    /// Replaces the current configuration, returning the previous one.
    pub fn replace(&self, config: Config) -> Arc<Config> {
        let next = Arc::new(config.sanitized());
        std::mem::replace(&mut *self.current.write(), next)
    }
}

impl ConfigSource for SharedConfig {
    fn snapshot(&self) -> Arc<Config> { Arc::clone(&self.current.read()) }
}

/// Renders the JSON schema of [`Config`] for editor integration.
///
/// # Errors
///
/// Returns an error if the schema cannot be serialized.
pub fn schema_json() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(Config);
    serde_json::to_string_pretty(&schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_config_snapshot_and_replace() {
        let shared = SharedConfig::new(Config::default());
        let before = shared.snapshot();
        assert!(!before.invert_scroll);

        let previous = shared.replace(Config { invert_scroll: true, ..Default::default() });
        assert!(!previous.invert_scroll);
        assert!(shared.snapshot().invert_scroll);

        // Earlier snapshots are unaffected by the swap.
        assert!(!before.invert_scroll);
    }

    #[test]
    fn test_shared_config_sanitizes() {
        let shared = SharedConfig::new(Config { zoom_threshold: 0.0, ..Default::default() });
        assert!(shared.snapshot().zoom_threshold > 0.0);
    }

    #[test]
    fn test_schema_mentions_config_fields() {
        let schema = schema_json().unwrap();
        assert!(schema.contains("dragThresholdPx"));
        assert!(schema.contains("zoomResetPolicy"));
    }
}
