//! Error types for the performance connection and recording front

use devtools_types::{ProtocolError, ProtocolViolation};
use thiserror::Error;

use crate::connection::ActorKind;

/// Errors that can occur while talking to the performance actors
#[derive(Error, Debug)]
pub enum PerformanceError {
    /// The target could not be made reachable over the remote protocol
    #[error("Target is not reachable: {0}")]
    TargetUnreachable(String),

    /// Neither the target nor the server advertised a profiler actor
    #[error("No profiler actor available for this target")]
    ProfilerActorUnavailable,

    /// A request was issued before `open()` completed
    #[error("Connection is not open")]
    NotOpened,

    /// The connection was destroyed and cannot be reopened
    #[error("Connection has been destroyed")]
    ConnectionDestroyed,

    /// The actor does not support the requested method
    #[error("Unknown method '{method}' for the {actor} actor")]
    UnknownMethod { actor: ActorKind, method: String },

    /// Request arguments were not a JSON object
    #[error("Request arguments must be a JSON object, got: {0}")]
    InvalidArguments(String),

    /// `stop_recording` was called without a running recording
    #[error("No recording in progress")]
    NotRecording,

    /// The actor replied with an error packet
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The actor replied with a packet the client could not interpret
    #[error("Malformed packet: {0}")]
    Violation(#[from] ProtocolViolation),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for performance operations
pub type Result<T> = std::result::Result<T, PerformanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PerformanceError::NotOpened;
        assert_eq!(err.to_string(), "Connection is not open");

        let err = PerformanceError::UnknownMethod {
            actor: ActorKind::Timeline,
            method: "rewind".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown method 'rewind' for the timeline actor");

        let err: PerformanceError = ProtocolError::unknown_error("boom").into();
        assert_eq!(err.to_string(), "Protocol error: unknownError: boom");
    }
}
