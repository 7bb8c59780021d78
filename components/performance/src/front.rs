//! Recording front
//!
//! A thin wrapper around a shared `PerformanceActorsConnection` that starts
//! and stops recordings manually.

use devtools_types::{
    EventEmitter, IsActiveReply, ListenerId, Preferences, ProfilerData, TimelineEvent,
    TimelineStartOptions,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{PerformanceConfig, SHOW_TIMELINE_MEMORY_PREF};
use crate::connection::{ActorKind, PerformanceActorsConnection};
use crate::error::{PerformanceError, Result};
use crate::samples::{filter_samples, offset_sample_times};
use crate::timeline::TimelineActor;

/// Events published by the recording front
#[derive(Debug, Clone, PartialEq)]
pub enum PerformanceEvent {
    /// The profiler was inactive and this front activated it
    ProfilerActivated,
    /// The profiler was already running for another client
    ProfilerAlreadyActive,
    /// Event forwarded from the timeline actor
    Timeline(TimelineEvent),
}

/// State captured when a recording starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingSession {
    /// Profiler time the recording starts at, in milliseconds
    pub start_time: f64,
    /// Whether the profiler was already running before the recording
    pub profiler_was_active: bool,
}

/// Data returned when a recording stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingResult {
    /// Length of the recording, in milliseconds
    pub recording_duration: f64,
    /// Profile with samples relative to the recording start
    pub profiler_data: ProfilerData,
}

/// Starts and stops recordings over a shared connection
pub struct PerformanceFront {
    connection: Arc<PerformanceActorsConnection>,
    timeline: Arc<dyn TimelineActor>,
    config: PerformanceConfig,
    prefs: Arc<dyn Preferences>,
    events: Arc<EventEmitter<PerformanceEvent>>,
    timeline_listener: Mutex<Option<ListenerId>>,
    session: Mutex<Option<RecordingSession>>,
}

impl PerformanceFront {
    /// Create a front over an opened connection
    ///
    /// Timeline events start flowing to this front's listeners immediately.
    pub fn new(
        connection: Arc<PerformanceActorsConnection>,
        config: PerformanceConfig,
        prefs: Arc<dyn Preferences>,
    ) -> Result<Self> {
        let timeline = connection.timeline()?;
        let events = Arc::new(EventEmitter::new());

        let forward = events.clone();
        let timeline_listener = timeline.on(Arc::new(move |event: &TimelineEvent| {
            forward.emit(&PerformanceEvent::Timeline(event.clone()));
        }));

        Ok(Self {
            connection,
            timeline,
            config,
            prefs,
            events,
            timeline_listener: Mutex::new(Some(timeline_listener)),
            session: Mutex::new(None),
        })
    }

    pub fn connection(&self) -> &Arc<PerformanceActorsConnection> {
        &self.connection
    }

    /// Subscribe to recording events
    pub fn on<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&PerformanceEvent) + Send + Sync + 'static,
    {
        self.events.on(listener)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    /// The running recording, if any
    pub fn current_session(&self) -> Option<RecordingSession> {
        *self.session.lock()
    }

    /// Begin a recording
    ///
    /// The profiler is process-wide, so a profiler another client already
    /// started is left running and the recording starts at its current time.
    pub async fn start_recording(&self) -> Result<RecordingSession> {
        let status: IsActiveReply = self.connection.profiler_request("isActive", None).await?;

        let session = if !status.is_active {
            let options = serde_json::to_value(self.config.profiler_options())?;
            self.connection
                .request(ActorKind::Profiler, "startProfiler", Some(options))
                .await?;
            info!("Profiler activated");
            RecordingSession {
                start_time: 0.0,
                profiler_was_active: false,
            }
        } else {
            info!("Profiler already active at {} ms", status.current_time);
            RecordingSession {
                start_time: status.current_time,
                profiler_was_active: true,
            }
        };

        let event = if session.profiler_was_active {
            PerformanceEvent::ProfilerAlreadyActive
        } else {
            PerformanceEvent::ProfilerActivated
        };
        self.events.emit(&event);

        // The timeline actor is target-dependent, so just make sure it records.
        let options = TimelineStartOptions {
            with_ticks: true,
            with_memory: self.show_timeline_memory(),
        };
        self.connection
            .request(ActorKind::Timeline, "start", Some(serde_json::to_value(options)?))
            .await?;

        *self.session.lock() = Some(session);
        Ok(session)
    }

    /// End the running recording and collect its data
    pub async fn stop_recording(&self) -> Result<RecordingResult> {
        let session = self
            .current_session()
            .ok_or(PerformanceError::NotRecording)?;

        let mut profiler_data: ProfilerData =
            self.connection.profiler_request("getProfile", None).await?;
        filter_samples(&mut profiler_data, session.start_time);
        offset_sample_times(&mut profiler_data, session.start_time);

        self.connection
            .request(ActorKind::Timeline, "stop", None)
            .await?;
        self.session.lock().take();

        let recording_duration = profiler_data.current_time - session.start_time;
        debug!("Recording stopped after {} ms", recording_duration);

        Ok(RecordingResult {
            recording_duration,
            profiler_data,
        })
    }

    fn show_timeline_memory(&self) -> bool {
        self.prefs
            .get_bool(SHOW_TIMELINE_MEMORY_PREF)
            .unwrap_or(self.config.show_timeline_memory_default())
    }

    /// Stop forwarding timeline events and drop every listener
    pub fn destroy(&self) {
        if let Some(id) = self.timeline_listener.lock().take() {
            self.timeline.off(id);
        }
        self.events.clear();
    }
}
