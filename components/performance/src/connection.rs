//! Connection to the profiler and timeline actors of one target
//!
//! Use `SharedPerformanceActors::for_target` to get the connection, and
//! `PerformanceFront` to start and stop recordings over it.

use devtools_types::{ActorId, ActorRequest, EventEmitter, TargetId, TimelineStartOptions};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::client::{send_request, DebuggerClient, Target};
use crate::error::{PerformanceError, Result};
use crate::timeline::{NullTimeline, TimelineActor, TimelineFront};

/// Backend actors reachable through the connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActorKind {
    Profiler,
    Timeline,
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorKind::Profiler => f.write_str("profiler"),
            ActorKind::Timeline => f.write_str("timeline"),
        }
    }
}

/// Lifecycle of a connection
///
/// `Unopened → Connecting → Connected → Destroyed`. A failed open falls back
/// to `Unopened`; nothing leaves `Destroyed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Unopened,
    Connecting,
    Connected,
    Destroyed,
}

/// Notifications about connection lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A connection was created for a target
    Created(TargetId),
    /// A connection finished opening
    Opened(TargetId),
}

/// Connection to the profiler and timeline actors, shared by every tool
/// working on the same target
pub struct PerformanceActorsConnection {
    target: Arc<dyn Target>,
    client: Arc<dyn DebuggerClient>,
    state: RwLock<ConnectionState>,
    /// Serializes `open()` so concurrent callers resolve the actors once
    open_lock: tokio::sync::Mutex<()>,
    profiler: RwLock<Option<ActorId>>,
    timeline: RwLock<Option<Arc<dyn TimelineActor>>>,
    notifications: Arc<EventEmitter<ConnectionEvent>>,
}

impl PerformanceActorsConnection {
    /// Create an unopened connection for `target`
    pub fn new(target: Arc<dyn Target>, notifications: Arc<EventEmitter<ConnectionEvent>>) -> Self {
        let client = target.client();
        Self {
            target,
            client,
            state: RwLock::new(ConnectionState::Unopened),
            open_lock: tokio::sync::Mutex::new(()),
            profiler: RwLock::new(None),
            timeline: RwLock::new(None),
            notifications,
        }
    }

    pub fn target_id(&self) -> TargetId {
        self.target.id()
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// The resolved profiler actor, once open
    pub fn profiler_actor(&self) -> Option<ActorId> {
        self.profiler.read().clone()
    }

    /// The timeline capability (real or inert), once open
    pub fn timeline(&self) -> Result<Arc<dyn TimelineActor>> {
        if self.state() == ConnectionState::Destroyed {
            return Err(PerformanceError::ConnectionDestroyed);
        }
        self.timeline.read().clone().ok_or(PerformanceError::NotOpened)
    }

    /// Connect to the profiler and timeline actors
    ///
    /// Does nothing if the connection is already open. Fails if the
    /// connection was destroyed.
    pub async fn open(&self) -> Result<()> {
        let _guard = self.open_lock.lock().await;

        match self.state() {
            ConnectionState::Connected => {
                debug!("Connection for target {} already open", self.target_id());
                return Ok(());
            }
            ConnectionState::Destroyed => return Err(PerformanceError::ConnectionDestroyed),
            ConnectionState::Unopened | ConnectionState::Connecting => {}
        }

        *self.state.write() = ConnectionState::Connecting;

        if let Err(e) = self.connect().await {
            warn!("Failed to open connection for target {}: {}", self.target_id(), e);
            let mut state = self.state.write();
            if *state == ConnectionState::Connecting {
                *state = ConnectionState::Unopened;
            }
            return Err(e);
        }

        {
            let mut state = self.state.write();
            if *state == ConnectionState::Destroyed {
                // destroy() ran while the actors were being resolved
                drop(state);
                self.release_timeline();
                return Err(PerformanceError::ConnectionDestroyed);
            }
            *state = ConnectionState::Connected;
        }

        info!("Performance actors connection opened for target {}", self.target_id());
        self.notifications
            .emit(&ConnectionEvent::Opened(self.target_id()));
        Ok(())
    }

    async fn connect(&self) -> Result<()> {
        // Local debugging needs to make the target remote.
        self.target.make_remote().await?;

        let profiler = self.connect_profiler_actor().await?;
        debug!("Using profiler actor {}", profiler);
        *self.profiler.write() = Some(profiler);

        let timeline = self.connect_timeline_actor();
        *self.timeline.write() = Some(timeline);
        Ok(())
    }

    async fn connect_profiler_actor(&self) -> Result<ActorId> {
        let form_actor = self.target.form().and_then(|form| form.profiler_actor);

        // Chrome targets and content processes come with their actor.
        if self.target.is_chrome() {
            return form_actor.ok_or(PerformanceError::ProfilerActorUnavailable);
        }
        if let Some(actor) = form_actor {
            return Ok(actor);
        }

        if let Some(actor) = self.target.root().and_then(|root| root.profiler_actor) {
            return Ok(actor);
        }

        debug!("Discovering profiler actor through listTabs");
        let reply = self.client.list_tabs().await?;
        reply
            .profiler_actor
            .ok_or(PerformanceError::ProfilerActorUnavailable)
    }

    fn connect_timeline_actor(&self) -> Arc<dyn TimelineActor> {
        match self.target.form().and_then(|form| form.timeline_actor) {
            Some(actor) => Arc::new(TimelineFront::new(self.client.clone(), actor)),
            None => {
                info!("Target {} has no timeline actor, using an inert timeline", self.target_id());
                Arc::new(NullTimeline)
            }
        }
    }

    fn release_timeline(&self) {
        let timeline = self.timeline.write().take();
        if let Some(timeline) = timeline {
            timeline.destroy();
        }
    }

    /// Release the timeline and close the connection for good
    pub fn destroy(&self) {
        self.release_timeline();
        *self.state.write() = ConnectionState::Destroyed;
        info!("Performance actors connection destroyed for target {}", self.target_id());
    }

    /// Send `method` to one of the backend actors
    ///
    /// Profiler requests travel as `{to, type, ...args}` packets. Timeline
    /// requests are dispatched onto the timeline capability; `args` are the
    /// `start` options, if any. Only a connected connection sends anything.
    pub async fn request(&self, actor: ActorKind, method: &str, args: Option<Value>) -> Result<Value> {
        debug!("Routing '{}' to the {} actor", method, actor);

        match self.state() {
            ConnectionState::Connected => {}
            ConnectionState::Destroyed => return Err(PerformanceError::ConnectionDestroyed),
            ConnectionState::Unopened | ConnectionState::Connecting => {
                return Err(PerformanceError::NotOpened)
            }
        }

        match actor {
            ActorKind::Profiler => {
                let profiler = self.profiler_actor().ok_or(PerformanceError::NotOpened)?;
                let fields = match args {
                    None | Some(Value::Null) => Map::new(),
                    Some(Value::Object(fields)) => fields,
                    Some(other) => return Err(PerformanceError::InvalidArguments(other.to_string())),
                };
                let packet = ActorRequest::new(profiler, method).with_fields(fields);
                send_request(self.client.as_ref(), packet).await
            }
            ActorKind::Timeline => {
                let timeline = self.timeline()?;
                match method {
                    "start" => {
                        let options = match args {
                            Some(args) => serde_json::from_value::<TimelineStartOptions>(args)?,
                            None => TimelineStartOptions::default(),
                        };
                        timeline.start(options).await?;
                        Ok(Value::Null)
                    }
                    "stop" => {
                        timeline.stop().await?;
                        Ok(Value::Null)
                    }
                    "isRecording" => Ok(Value::Bool(timeline.is_recording().await?)),
                    "destroy" => {
                        timeline.destroy();
                        Ok(Value::Null)
                    }
                    _ => {
                        warn!("Unknown timeline method: {}", method);
                        Err(PerformanceError::UnknownMethod {
                            actor,
                            method: method.to_string(),
                        })
                    }
                }
            }
        }
    }

    /// Send a profiler request and decode the reply
    pub async fn profiler_request<T: DeserializeOwned>(
        &self,
        method: &str,
        args: Option<Value>,
    ) -> Result<T> {
        let reply = self.request(ActorKind::Profiler, method, args).await?;
        Ok(serde_json::from_value(reply)?)
    }
}

impl fmt::Debug for PerformanceActorsConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerformanceActorsConnection")
            .field("target", &self.target_id())
            .field("state", &self.state())
            .field("profiler", &self.profiler_actor())
            .finish()
    }
}
