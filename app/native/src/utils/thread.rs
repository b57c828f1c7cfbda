use std::thread::{self, JoinHandle};

use crate::error::MouseflowError;

/// Spawns a background thread named `mouseflow-<name>`.
///
/// # Errors
///
/// Returns [`MouseflowError::Io`] if the OS refuses to create the thread.
pub fn spawn_named_thread<F>(name: &str, task: F) -> Result<JoinHandle<()>, MouseflowError>
where F: FnOnce() + Send + 'static {
    let thread_name = format!("mouseflow-{name}");

    thread::Builder::new().name(thread_name.clone()).spawn(task).map_err(|err| {
        tracing::error!(thread = %thread_name, error = %err, "failed to spawn thread");
        MouseflowError::from(err)
    })
}
