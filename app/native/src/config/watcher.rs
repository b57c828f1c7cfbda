//! Configuration file watcher for hot-reloading.
//!
//! Watches the configuration file and hands every successfully reloaded
//! [`Config`] to a callback, which typically forwards it to
//! [`crate::source::Monitor::apply_config`].

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use super::{Config, load_config_from_path};
use crate::error::MouseflowError;
use crate::utils::thread::spawn_named_thread;

/// Debounce duration for config file changes.
/// Some editors trigger multiple events per save (write to temp, rename, etc.).
const CONFIG_DEBOUNCE_MS: u64 = 200;

/// Starts watching `config_path` for changes.
///
/// Spawns a background thread that owns the watcher. On each change the file
/// is reloaded and sanitized; parse failures are logged and the previous
/// configuration stays in effect.
///
/// # Errors
///
/// Returns an error if the watcher thread cannot be spawned.
pub fn watch_config_file<F>(config_path: PathBuf, on_change: F) -> Result<(), MouseflowError>
where F: Fn(Config) + Send + 'static {
    let config_filename = config_path.file_name().map(OsString::from).unwrap_or_default();

    spawn_named_thread("config-watcher", move || {
        let (tx, rx) = std::sync::mpsc::channel();

        let mut watcher: RecommendedWatcher = match notify::recommended_watcher(tx) {
            Ok(w) => w,
            Err(err) => {
                tracing::warn!(error = %err, "failed to create config watcher");
                return;
            }
        };

        // Watch the parent directory to catch file replacements
        // (some editors save by writing to a temp file then renaming)
        let watch_path = config_path.parent().unwrap_or(&config_path);

        if let Err(err) = watcher.watch(watch_path, RecursiveMode::NonRecursive) {
            tracing::warn!(error = %err, path = %watch_path.display(), "failed to watch config file");
            return;
        }

        tracing::info!(path = %config_path.display(), "watching configuration file");

        let debounce = Duration::from_millis(CONFIG_DEBOUNCE_MS);

        while let Ok(result) = rx.recv() {
            let event = match result {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!(error = %err, "config watch error");
                    continue;
                }
            };

            let affects_config =
                event.paths.iter().any(|p| p.file_name().is_some_and(|name| name == config_filename));
            if !affects_config {
                continue;
            }

            // Reload once the burst has gone quiet so the last write wins.
            if !wait_for_quiet(&rx, debounce) {
                break;
            }

            match load_config_from_path(&config_path) {
                Ok((config, _)) => {
                    tracing::info!("configuration reloaded");
                    on_change(config);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "failed to reload configuration, keeping previous");
                }
            }
        }

        tracing::debug!("config watcher channel closed");
    })?;

    Ok(())
}

/// Drains `rx` until no message arrives for `quiet`.
///
/// Returns `false` if the channel disconnected while waiting.
fn wait_for_quiet<T>(rx: &Receiver<T>, quiet: Duration) -> bool {
    loop {
        match rx.recv_timeout(quiet) {
            Ok(_) => {}
            Err(RecvTimeoutError::Timeout) => return true,
            Err(RecvTimeoutError::Disconnected) => return false,
        }
    }
}
