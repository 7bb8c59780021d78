//! Performance recording over the remote debugging protocol
//!
//! This crate connects a devtools front-end to the profiler and timeline
//! actors of a debug target and drives recordings over that connection.
//!
//! # Features
//!
//! - **SharedPerformanceActors**: one connection per target, shared by every tool
//! - **PerformanceActorsConnection**: resolves the profiler and timeline actors and
//!   routes requests to them
//! - **TimelineActor**: real `TimelineFront` or inert `NullTimeline`, picked when
//!   the connection opens
//! - **PerformanceFront**: start/stop recordings, timeline event forwarding and
//!   sample post-processing
//!
//! ## Usage
//!
//! ```rust
//! use devtools_types::MemoryPreferences;
//! use performance::{
//!     MockDebuggerClient, MockTarget, PerformanceConfig, PerformanceFront,
//!     SharedPerformanceActors, Target,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = Arc::new(MockDebuggerClient::new());
//!     let target: Arc<dyn Target> = Arc::new(MockTarget::new(client.clone()));
//!
//!     let registry = SharedPerformanceActors::new();
//!     let connection = registry.for_target(&target);
//!     connection.open().await.unwrap();
//!
//!     let front = PerformanceFront::new(
//!         connection,
//!         PerformanceConfig::default(),
//!         Arc::new(MemoryPreferences::new()),
//!     )
//!     .unwrap();
//!
//!     front.start_recording().await.unwrap();
//!     let result = front.stop_recording().await.unwrap();
//!     assert_eq!(result.recording_duration, 0.0);
//! }
//! ```

mod client;
mod config;
mod connection;
mod error;
mod front;
mod mock_target;
mod registry;
mod samples;
mod timeline;

pub use client::{DebuggerClient, Target};
pub use config::{PerformanceConfig, PerformanceConfigBuilder, SHOW_TIMELINE_MEMORY_PREF};
pub use connection::{ActorKind, ConnectionEvent, ConnectionState, PerformanceActorsConnection};
pub use error::{PerformanceError, Result};
pub use front::{PerformanceEvent, PerformanceFront, RecordingResult, RecordingSession};
pub use mock_target::{MockDebuggerClient, MockTarget};
pub use registry::{get_performance_actors_connection, SharedPerformanceActors};
pub use samples::{filter_samples, offset_sample_times};
pub use timeline::{NullTimeline, TimelineActor, TimelineFront};
