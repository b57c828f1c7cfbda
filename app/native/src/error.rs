//! Error types for Mouseflow.
//!
//! The classification core never fails; these errors only come out of the
//! collaborator seams (configuration loading, event sources, action dispatch).

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::dispatch::DispatchError;

/// Errors that can occur outside the classification core.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum MouseflowError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
    /// IO error.
    #[error("IO error: {0}")]
    Io(String),
    /// Action dispatch failed.
    #[error("Dispatch error: {0}")]
    Dispatch(String),
    /// The event source could not be started.
    #[error("Event source error: {0}")]
    EventSource(String),
    /// Timer scheduling failed.
    #[error("Timer error: {0}")]
    Timer(String),
}

impl From<std::io::Error> for MouseflowError {
    fn from(err: std::io::Error) -> Self { Self::Io(err.to_string()) }
}

impl From<serde_json::Error> for MouseflowError {
    fn from(err: serde_json::Error) -> Self { Self::Config(err.to_string()) }
}

impl From<ConfigError> for MouseflowError {
    fn from(err: ConfigError) -> Self { Self::Config(err.to_string()) }
}

impl From<DispatchError> for MouseflowError {
    fn from(err: DispatchError) -> Self { Self::Dispatch(err.to_string()) }
}

impl From<String> for MouseflowError {
    fn from(msg: String) -> Self { Self::EventSource(msg) }
}

impl From<&str> for MouseflowError {
    fn from(msg: &str) -> Self { Self::EventSource(msg.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = MouseflowError::Config("Invalid JSON".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("Invalid JSON"));
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err: MouseflowError = io_err.into();
        assert!(matches!(err, MouseflowError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: MouseflowError = ConfigError::NotFound.into();
        assert!(matches!(err, MouseflowError::Config(_)));
    }

    #[test]
    fn test_from_str_is_event_source_error() {
        let err: MouseflowError = "tap creation failed".into();
        assert!(matches!(err, MouseflowError::EventSource(_)));
        assert_eq!(err.to_string(), "Event source error: tap creation failed");
    }

    #[test]
    fn test_dispatch_error_conversion() {
        let err: MouseflowError = DispatchError::QueueFull.into();
        assert!(matches!(err, MouseflowError::Dispatch(_)));
        assert!(err.to_string().contains("Action queue full"));
    }

    #[test]
    fn test_error_serializes_with_kind() {
        let err = MouseflowError::Dispatch("queue closed".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"kind\":\"Dispatch\""));
        assert!(json.contains("queue closed"));
    }
}
