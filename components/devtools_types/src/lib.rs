// Remote debugging protocol types, events, and error definitions
//
// This module is part of the CortenBrowser DevTools implementation.

pub mod emitter;
pub mod errors;
pub mod prefs;
pub mod profiler;
pub mod timeline;

// Re-export commonly used types
pub use emitter::{EventEmitter, Listener, ListenerId};
pub use errors::{ProtocolError, ProtocolViolation};
pub use prefs::{MemoryPreferences, Preferences};
pub use profiler::{IsActiveReply, Profile, ProfilerData, ProfilerOptions, Sample, ThreadProfile};
pub use timeline::{Marker, MemoryMeasurement, TimelineEvent, TimelineStartOptions};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Identifier of a backend actor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a debuggable page or process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(Uuid);

impl TargetId {
    /// Generate a fresh target identity
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TargetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request envelope addressed to an actor
///
/// Serializes as `{"to": <actor>, "type": <method>, ...fields}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActorRequest {
    /// Destination actor
    pub to: ActorId,
    /// Method name understood by the actor
    #[serde(rename = "type")]
    pub method: String,
    /// Extra request fields, flattened into the envelope
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ActorRequest {
    /// Create a request with no extra fields
    pub fn new(to: ActorId, method: impl Into<String>) -> Self {
        Self {
            to,
            method: method.into(),
            fields: Map::new(),
        }
    }

    /// Merge the fields of a JSON object into the envelope
    ///
    /// `to` and `type` always win over same-named entries in `fields`.
    pub fn with_fields(mut self, fields: Map<String, Value>) -> Self {
        for (key, value) in fields {
            if key == "to" || key == "type" {
                continue;
            }
            self.fields.insert(key, value);
        }
        self
    }
}

/// Packet pushed by an actor without a matching request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnsolicitedPacket {
    /// Emitting actor
    pub from: ActorId,
    /// Event name
    #[serde(rename = "type")]
    pub kind: String,
    /// Event payload
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

/// Description of a target as advertised by the server
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TargetForm {
    /// The target's own actor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
    /// Pre-known profiler actor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiler_actor: Option<ActorId>,
    /// Timeline actor, present only when the server supports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline_actor: Option<ActorId>,
}

/// Root actor description, cached from an earlier `listTabs` exchange
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RootForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiler_actor: Option<ActorId>,
}

/// Reply to a `listTabs` request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListTabsReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiler_actor: Option<ActorId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_envelope() {
        let mut fields = Map::new();
        fields.insert("entries".to_string(), json!(100));
        let request = ActorRequest::new(ActorId::new("conn0.profiler1"), "startProfiler")
            .with_fields(fields);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"to": "conn0.profiler1", "type": "startProfiler", "entries": 100})
        );
    }

    #[test]
    fn test_request_fields_cannot_override_routing() {
        let mut fields = Map::new();
        fields.insert("to".to_string(), json!("elsewhere"));
        fields.insert("type".to_string(), json!("other"));
        let request = ActorRequest::new(ActorId::new("profiler"), "isActive").with_fields(fields);

        assert_eq!(request.to.as_str(), "profiler");
        assert_eq!(request.method, "isActive");
        assert!(request.fields.is_empty());
    }

    #[test]
    fn test_unsolicited_packet_parse() {
        let packet: UnsolicitedPacket = serde_json::from_value(json!({
            "from": "conn0.timeline3",
            "type": "ticks",
            "delta": 12.5,
            "timestamps": [1.0, 2.0]
        }))
        .unwrap();

        assert_eq!(packet.from, ActorId::new("conn0.timeline3"));
        assert_eq!(packet.kind, "ticks");
        assert_eq!(packet.body["delta"], json!(12.5));
    }

    #[test]
    fn test_target_form_camel_case() {
        let form: TargetForm = serde_json::from_value(json!({
            "actor": "conn0.tab1",
            "profilerActor": "conn0.profiler2",
        }))
        .unwrap();

        assert_eq!(form.profiler_actor, Some(ActorId::new("conn0.profiler2")));
        assert!(form.timeline_actor.is_none());
    }

    #[test]
    fn test_target_ids_are_unique() {
        assert_ne!(TargetId::new(), TargetId::new());
    }
}
