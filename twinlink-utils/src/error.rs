//! Error types for twinlink
//!
//! Provides a unified error type used across all twinlink crates.

use std::path::PathBuf;
use std::time::Duration;

/// Main error type for twinlink operations
#[derive(Debug, thiserror::Error)]
pub enum TwinError {
    // === IO Errors ===

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // === Backend Process Errors ===

    #[error("Failed to spawn backend: {0}")]
    Spawn(String),

    #[error("Backend binary not found: {0}")]
    BackendNotFound(String),

    #[error("Backend did not exit within {grace:?}")]
    Teardown { grace: Duration },

    // === Connection Errors ===

    #[error("Backend not reachable at {path} after {attempts} attempts")]
    Connect { path: PathBuf, attempts: u32 },

    #[error("Not connected to a backend")]
    NotConnected,

    #[error("Connection closed unexpectedly")]
    ConnectionClosed,

    #[error("No reply within {timeout:?}")]
    ReplyTimeout { timeout: Duration },

    // === Protocol Errors ===

    #[error("Protocol decode failed: {0}")]
    Decode(String),

    // === Object Errors ===

    #[error("Object '{name}' is not a {expected}")]
    WrongKind { name: String, expected: &'static str },

    #[error("Operation not supported by the backend: {0}")]
    Unsupported(&'static str),

    // === Configuration Errors ===

    #[error("Configuration error: {0}")]
    Config(String),

    // === Internal Errors ===

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TwinError {
    /// Create a spawn error
    pub fn spawn(msg: impl Into<String>) -> Self {
        Self::Spawn(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this error leaves the session connection unusable
    ///
    /// Decode failures leave the transport open and usable for the next
    /// call; transport-level failures poison the session until the next
    /// `load`.
    pub fn is_connection_fatal(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::ConnectionClosed
                | Self::ReplyTimeout { .. }
                | Self::Connect { .. }
        )
    }
}

/// Result type alias using TwinError
pub type Result<T> = std::result::Result<T, TwinError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TwinError::WrongKind {
            name: "conveyor".into(),
            expected: "Robot",
        };
        assert_eq!(err.to_string(), "Object 'conveyor' is not a Robot");
    }

    #[test]
    fn test_connect_display_includes_attempts() {
        let err = TwinError::Connect {
            path: PathBuf::from("/tmp/twinlink/scene.json.sock"),
            attempts: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("scene.json.sock"));
        assert!(msg.contains("4 attempts"));
    }

    #[test]
    fn test_connection_fatal_classification() {
        assert!(TwinError::ConnectionClosed.is_connection_fatal());
        assert!(TwinError::ReplyTimeout {
            timeout: Duration::from_secs(5)
        }
        .is_connection_fatal());
        assert!(!TwinError::Decode("bad json".into()).is_connection_fatal());
        assert!(!TwinError::Unsupported("set_home").is_connection_fatal());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        let err: TwinError = io_err.into();
        assert!(matches!(err, TwinError::Io(_)));
        assert!(err.is_connection_fatal());
    }
}
