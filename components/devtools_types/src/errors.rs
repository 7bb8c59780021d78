// Remote debugging protocol error types
// Actors reply with `{"from": <actor>, "error": <name>, "message": <text>}` on failure

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::ActorId;

/// Error reply produced by an actor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProtocolError {
    /// Actor that produced the error (if known)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<ActorId>,
    /// Error name (e.g. "noSuchActor")
    pub error: String,
    /// Human-readable error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.from, &self.message) {
            (Some(from), Some(message)) => write!(f, "{} from {}: {}", self.error, from, message),
            (Some(from), None) => write!(f, "{} from {}", self.error, from),
            (None, Some(message)) => write!(f, "{}: {}", self.error, message),
            (None, None) => f.write_str(&self.error),
        }
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            from: None,
            error: error.into(),
            message: Some(message.into()),
        }
    }

    /// Attach the originating actor
    pub fn from_actor(mut self, actor: ActorId) -> Self {
        self.from = Some(actor);
        self
    }

    /// The addressed actor does not exist
    pub fn no_such_actor(actor: &ActorId) -> Self {
        Self::new("noSuchActor", format!("No such actor for ID: {}", actor))
    }

    /// The actor does not understand the request type
    pub fn unrecognized_packet_type(method: &str) -> Self {
        Self::new(
            "unrecognizedPacketType",
            format!("Actor does not recognize the packet type '{}'", method),
        )
    }

    /// The transport went away before a reply arrived
    pub fn connection_closed() -> Self {
        Self::new("connectionClosed", "The debugging connection was closed")
    }

    /// Generic failure raised by the actor
    pub fn unknown_error(details: impl Into<String>) -> Self {
        Self::new("unknownError", details)
    }

    /// Extract an error from a reply packet, if it carries one
    ///
    /// Replies without an `error` field are successful.
    pub fn from_reply(reply: &Value) -> Option<Self> {
        let error = reply.get("error")?.as_str()?;
        Some(Self {
            from: reply
                .get("from")
                .and_then(Value::as_str)
                .map(ActorId::new),
            error: error.to_string(),
            message: reply
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

/// Malformed traffic detected on the client side
#[derive(Error, Debug)]
pub enum ProtocolViolation {
    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Packet missing a field its type requires
    #[error("Packet '{kind}' is missing field '{field}'")]
    MissingField { kind: String, field: &'static str },

    /// Generic protocol error
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}
