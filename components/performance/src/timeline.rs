//! Timeline capability
//!
//! Servers that advertise a timeline actor get a `TimelineFront`; older ones
//! get a `NullTimeline` so callers never have to special-case them.

use async_trait::async_trait;
use devtools_types::{
    ActorId, ActorRequest, EventEmitter, Listener, ListenerId, ProtocolViolation, TimelineEvent,
    TimelineStartOptions, UnsolicitedPacket,
};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::{send_request, DebuggerClient};
use crate::error::Result;

/// Operations the recording front needs from a timeline
#[async_trait]
pub trait TimelineActor: Send + Sync {
    /// Start recording markers (and optionally ticks and memory)
    async fn start(&self, options: TimelineStartOptions) -> Result<()>;

    /// Stop recording
    async fn stop(&self) -> Result<()>;

    /// Whether the timeline is currently recording
    async fn is_recording(&self) -> Result<bool>;

    /// Subscribe to timeline events
    fn on(&self, listener: Listener<TimelineEvent>) -> ListenerId;

    /// Unsubscribe from timeline events
    fn off(&self, id: ListenerId) -> bool;

    /// Release the timeline
    fn destroy(&self);

    /// Whether a real backend actor stands behind this timeline
    fn is_supported(&self) -> bool;
}

/// Timeline backed by a server-side timeline actor
pub struct TimelineFront {
    actor: ActorId,
    client: Arc<dyn DebuggerClient>,
    events: Arc<EventEmitter<TimelineEvent>>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl TimelineFront {
    /// Create a front for `actor` and start forwarding its events
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(client: Arc<dyn DebuggerClient>, actor: ActorId) -> Self {
        let events = Arc::new(EventEmitter::new());
        let pump = tokio::spawn(pump_events(
            client.unsolicited(),
            actor.clone(),
            events.clone(),
        ));

        info!("Timeline front created for {}", actor);

        Self {
            actor,
            client,
            events,
            pump: Mutex::new(Some(pump)),
        }
    }

    pub fn actor(&self) -> &ActorId {
        &self.actor
    }

    async fn send(&self, method: &str, fields: Map<String, Value>) -> Result<Value> {
        let packet = ActorRequest::new(self.actor.clone(), method).with_fields(fields);
        send_request(self.client.as_ref(), packet).await
    }
}

async fn pump_events(
    mut packets: broadcast::Receiver<UnsolicitedPacket>,
    actor: ActorId,
    events: Arc<EventEmitter<TimelineEvent>>,
) {
    loop {
        match packets.recv().await {
            Ok(packet) if packet.from == actor => match TimelineEvent::from_packet(&packet) {
                Ok(Some(event)) => {
                    debug!("Timeline event '{}' from {}", event.name(), actor);
                    events.emit(&event);
                }
                Ok(None) => debug!("Ignoring '{}' packet from {}", packet.kind, actor),
                Err(e) => warn!("Dropping malformed timeline packet: {}", e),
            },
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!("Timeline event pump lagged, {} packets skipped", skipped);
            }
            Err(RecvError::Closed) => {
                debug!("Unsolicited packet stream closed for {}", actor);
                break;
            }
        }
    }
}

#[async_trait]
impl TimelineActor for TimelineFront {
    async fn start(&self, options: TimelineStartOptions) -> Result<()> {
        let fields = match serde_json::to_value(options)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.send("start", fields).await?;
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.send("stop", Map::new()).await?;
        Ok(())
    }

    async fn is_recording(&self) -> Result<bool> {
        let reply = self.send("isRecording", Map::new()).await?;
        reply.get("value").and_then(Value::as_bool).ok_or_else(|| {
            ProtocolViolation::MissingField {
                kind: "isRecording".to_string(),
                field: "value",
            }
            .into()
        })
    }

    fn on(&self, listener: Listener<TimelineEvent>) -> ListenerId {
        self.events.add(listener)
    }

    fn off(&self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    fn destroy(&self) {
        if let Some(pump) = self.pump.lock().take() {
            pump.abort();
        }
        self.events.clear();
        info!("Timeline front for {} destroyed", self.actor);
    }

    fn is_supported(&self) -> bool {
        true
    }
}

impl Drop for TimelineFront {
    fn drop(&mut self) {
        if let Some(pump) = self.pump.get_mut().take() {
            pump.abort();
        }
    }
}

/// Inert timeline for servers without a timeline actor
#[derive(Debug, Default)]
pub struct NullTimeline;

#[async_trait]
impl TimelineActor for NullTimeline {
    async fn start(&self, _options: TimelineStartOptions) -> Result<()> {
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        Ok(())
    }

    async fn is_recording(&self) -> Result<bool> {
        Ok(false)
    }

    fn on(&self, _listener: Listener<TimelineEvent>) -> ListenerId {
        ListenerId::new()
    }

    fn off(&self, _id: ListenerId) -> bool {
        false
    }

    fn destroy(&self) {}

    fn is_supported(&self) -> bool {
        false
    }
}
