//! Mock target and debugger client for testing the performance connection
//!
//! Simulates a server with a process-wide profiler actor and an optional
//! per-target timeline actor.

use async_trait::async_trait;
use devtools_types::{
    ActorId, ActorRequest, ListTabsReply, ProtocolError, RootForm, TargetForm, TargetId,
    TimelineStartOptions, UnsolicitedPacket,
};
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::client::{DebuggerClient, Target};
use crate::error::{PerformanceError, Result};

#[derive(Debug, Default)]
struct MockProfilerState {
    active: bool,
    current_time: f64,
    sample_times: Vec<f64>,
    start_options: Option<Value>,
}

#[derive(Debug, Default)]
struct MockTimelineState {
    recording: bool,
    last_options: Option<TimelineStartOptions>,
}

/// Mock remote debugging client
pub struct MockDebuggerClient {
    profiler_actor: ActorId,
    timeline_actor: ActorId,
    profiler: Mutex<MockProfilerState>,
    timeline: Mutex<MockTimelineState>,
    requests: Mutex<Vec<ActorRequest>>,
    failing_methods: Mutex<HashSet<String>>,
    disconnected: AtomicBool,
    list_tabs_calls: AtomicUsize,
    packets: broadcast::Sender<UnsolicitedPacket>,
}

impl MockDebuggerClient {
    /// Create a client whose profiler is idle at time 0
    pub fn new() -> Self {
        let (packets, _) = broadcast::channel(64);
        Self {
            profiler_actor: ActorId::new("conn0.profiler1"),
            timeline_actor: ActorId::new("conn0.timeline2"),
            profiler: Mutex::new(MockProfilerState::default()),
            timeline: Mutex::new(MockTimelineState::default()),
            requests: Mutex::new(Vec::new()),
            failing_methods: Mutex::new(HashSet::new()),
            disconnected: AtomicBool::new(false),
            list_tabs_calls: AtomicUsize::new(0),
            packets,
        }
    }

    pub fn profiler_actor(&self) -> ActorId {
        self.profiler_actor.clone()
    }

    pub fn timeline_actor(&self) -> ActorId {
        self.timeline_actor.clone()
    }

    /// Pretend another client already started the profiler
    pub fn set_profiler_active(&self, current_time: f64) {
        let mut profiler = self.profiler.lock();
        profiler.active = true;
        profiler.current_time = current_time;
    }

    pub fn set_current_time(&self, current_time: f64) {
        self.profiler.lock().current_time = current_time;
    }

    /// Sample times `getProfile` reports for the first thread
    pub fn set_samples(&self, times: &[f64]) {
        self.profiler.lock().sample_times = times.to_vec();
    }

    pub fn is_profiler_active(&self) -> bool {
        self.profiler.lock().active
    }

    /// Options received with the last `startProfiler`
    pub fn profiler_start_options(&self) -> Option<Value> {
        self.profiler.lock().start_options.clone()
    }

    pub fn is_timeline_recording(&self) -> bool {
        self.timeline.lock().recording
    }

    pub fn last_timeline_options(&self) -> Option<TimelineStartOptions> {
        self.timeline.lock().last_options
    }

    /// Make the actors reply with an error packet to `method`
    pub fn fail_method(&self, method: &str) {
        self.failing_methods.lock().insert(method.to_string());
    }

    /// Drop or restore the transport; a dropped transport fails every call
    pub fn set_disconnected(&self, disconnected: bool) {
        self.disconnected.store(disconnected, Ordering::SeqCst);
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<ActorRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received for `method`
    pub fn request_count(&self, method: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|request| request.method == method)
            .count()
    }

    pub fn list_tabs_calls(&self) -> usize {
        self.list_tabs_calls.load(Ordering::SeqCst)
    }

    /// Push an event packet from the timeline actor
    pub fn push_timeline_packet(&self, kind: &str, body: Value) {
        let body = match body {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let _ = self.packets.send(UnsolicitedPacket {
            from: self.timeline_actor.clone(),
            kind: kind.to_string(),
            body,
        });
    }

    fn profiler_reply(&self, request: &ActorRequest) -> std::result::Result<Value, ProtocolError> {
        let mut profiler = self.profiler.lock();
        match request.method.as_str() {
            "isActive" => Ok(json!({
                "from": self.profiler_actor,
                "isActive": profiler.active,
                "currentTime": profiler.current_time,
            })),
            "startProfiler" => {
                profiler.active = true;
                profiler.start_options = Some(Value::Object(request.fields.clone()));
                Ok(json!({ "from": self.profiler_actor, "started": true }))
            }
            "getProfile" => {
                let samples: Vec<Value> = profiler
                    .sample_times
                    .iter()
                    .map(|time| json!({ "time": time, "frames": [{ "location": "(root)" }] }))
                    .collect();
                Ok(json!({
                    "from": self.profiler_actor,
                    "currentTime": profiler.current_time,
                    "profile": {
                        "meta": { "interval": 1 },
                        "threads": [{ "name": "GeckoMain", "samples": samples }]
                    }
                }))
            }
            other => Err(ProtocolError::unrecognized_packet_type(other)
                .from_actor(self.profiler_actor.clone())),
        }
    }

    fn timeline_reply(&self, request: &ActorRequest) -> std::result::Result<Value, ProtocolError> {
        let mut timeline = self.timeline.lock();
        match request.method.as_str() {
            "start" => {
                let options: TimelineStartOptions =
                    serde_json::from_value(Value::Object(request.fields.clone()))
                        .unwrap_or_default();
                timeline.recording = true;
                timeline.last_options = Some(options);
                Ok(json!({ "from": self.timeline_actor }))
            }
            "stop" => {
                timeline.recording = false;
                Ok(json!({ "from": self.timeline_actor }))
            }
            "isRecording" => Ok(json!({ "from": self.timeline_actor, "value": timeline.recording })),
            other => Err(ProtocolError::unrecognized_packet_type(other)
                .from_actor(self.timeline_actor.clone())),
        }
    }
}

impl Default for MockDebuggerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DebuggerClient for MockDebuggerClient {
    async fn request(&self, packet: ActorRequest) -> std::result::Result<Value, ProtocolError> {
        if self.disconnected.load(Ordering::SeqCst) {
            return Err(ProtocolError::connection_closed());
        }
        self.requests.lock().push(packet.clone());

        if self.failing_methods.lock().contains(&packet.method) {
            return Ok(json!({
                "from": packet.to,
                "error": "unknownError",
                "message": format!("{} failed", packet.method),
            }));
        }

        if packet.to == self.profiler_actor {
            self.profiler_reply(&packet)
        } else if packet.to == self.timeline_actor {
            self.timeline_reply(&packet)
        } else {
            Err(ProtocolError::no_such_actor(&packet.to))
        }
    }

    async fn list_tabs(&self) -> std::result::Result<ListTabsReply, ProtocolError> {
        self.list_tabs_calls.fetch_add(1, Ordering::SeqCst);
        if self.disconnected.load(Ordering::SeqCst) {
            return Err(ProtocolError::connection_closed());
        }
        Ok(ListTabsReply {
            profiler_actor: Some(self.profiler_actor.clone()),
            extra: Map::new(),
        })
    }

    fn unsolicited(&self) -> broadcast::Receiver<UnsolicitedPacket> {
        self.packets.subscribe()
    }
}

/// Mock debug target
pub struct MockTarget {
    id: TargetId,
    chrome: bool,
    reachable: bool,
    form: TargetForm,
    root: Option<RootForm>,
    client: Arc<MockDebuggerClient>,
    make_remote_calls: AtomicUsize,
    remote: AtomicBool,
}

impl MockTarget {
    /// Target whose form advertises both the profiler and the timeline actor
    pub fn new(client: Arc<MockDebuggerClient>) -> Self {
        let form = TargetForm {
            actor: Some(ActorId::new("conn0.tab1")),
            profiler_actor: Some(client.profiler_actor()),
            timeline_actor: Some(client.timeline_actor()),
        };
        Self {
            id: TargetId::new(),
            chrome: false,
            reachable: true,
            form,
            root: None,
            client,
            make_remote_calls: AtomicUsize::new(0),
            remote: AtomicBool::new(false),
        }
    }

    /// Server without timeline support
    pub fn without_timeline(mut self) -> Self {
        self.form.timeline_actor = None;
        self
    }

    /// Form without a pre-known profiler actor
    pub fn without_form_profiler(mut self) -> Self {
        self.form.profiler_actor = None;
        self
    }

    /// Root form with a cached profiler actor
    pub fn with_root_profiler(mut self, actor: ActorId) -> Self {
        self.root = Some(RootForm {
            profiler_actor: Some(actor),
        });
        self
    }

    pub fn chrome(mut self) -> Self {
        self.chrome = true;
        self
    }

    /// `make_remote` fails
    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }

    pub fn make_remote_calls(&self) -> usize {
        self.make_remote_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Target for MockTarget {
    fn id(&self) -> TargetId {
        self.id
    }

    fn is_chrome(&self) -> bool {
        self.chrome
    }

    async fn make_remote(&self) -> Result<()> {
        self.make_remote_calls.fetch_add(1, Ordering::SeqCst);
        if !self.reachable {
            return Err(PerformanceError::TargetUnreachable(format!(
                "target {} refused the connection",
                self.id
            )));
        }
        self.remote.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn form(&self) -> Option<TargetForm> {
        self.remote
            .load(Ordering::SeqCst)
            .then(|| self.form.clone())
    }

    fn root(&self) -> Option<RootForm> {
        self.root.clone()
    }

    fn client(&self) -> Arc<dyn DebuggerClient> {
        self.client.clone()
    }
}
