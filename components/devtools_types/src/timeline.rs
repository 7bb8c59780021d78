//! Timeline actor payloads and events

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ProtocolViolation;
use crate::UnsolicitedPacket;

/// Options sent with the timeline `start` request
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineStartOptions {
    /// Emit refresh-driver ticks
    #[serde(default)]
    pub with_ticks: bool,
    /// Emit periodic memory measurements
    #[serde(default)]
    pub with_memory: bool,
}

/// Timeline marker (reflow, paint, GC, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Marker {
    pub name: String,
    pub start: f64,
    pub end: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Memory measurement attached to a `memory` event
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MemoryMeasurement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Events emitted by the timeline actor during a recording
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TimelineEvent {
    /// Batch of markers
    Markers { markers: Vec<Marker> },
    /// Memory measurement
    Memory {
        delta: f64,
        measurement: MemoryMeasurement,
    },
    /// Refresh-driver ticks
    Ticks { delta: f64, timestamps: Vec<f64> },
}

impl TimelineEvent {
    /// Interpret an unsolicited packet as a timeline event
    ///
    /// Returns `Ok(None)` for packet types the timeline does not define.
    pub fn from_packet(packet: &UnsolicitedPacket) -> Result<Option<Self>, ProtocolViolation> {
        match packet.kind.as_str() {
            "markers" => Ok(Some(TimelineEvent::Markers {
                markers: field(packet, "markers")?,
            })),
            "memory" => Ok(Some(TimelineEvent::Memory {
                delta: field(packet, "delta")?,
                measurement: field(packet, "measurement")?,
            })),
            "ticks" => Ok(Some(TimelineEvent::Ticks {
                delta: field(packet, "delta")?,
                timestamps: field(packet, "timestamps")?,
            })),
            _ => Ok(None),
        }
    }

    /// Event name as used on the wire
    pub fn name(&self) -> &'static str {
        match self {
            TimelineEvent::Markers { .. } => "markers",
            TimelineEvent::Memory { .. } => "memory",
            TimelineEvent::Ticks { .. } => "ticks",
        }
    }
}

fn field<T: serde::de::DeserializeOwned>(
    packet: &UnsolicitedPacket,
    name: &'static str,
) -> Result<T, ProtocolViolation> {
    let value = packet
        .body
        .get(name)
        .cloned()
        .ok_or_else(|| ProtocolViolation::MissingField {
            kind: packet.kind.clone(),
            field: name,
        })?;
    Ok(serde_json::from_value(value)?)
}
