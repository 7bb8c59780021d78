//! Profiler actor payloads
//!
//! Only the fields the client interprets are typed; everything else the
//! profiler sends is carried through untouched in flattened maps.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reply to `isActive`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IsActiveReply {
    /// Whether the profiler is currently sampling
    pub is_active: bool,
    /// Profiler clock, in milliseconds
    #[serde(default)]
    pub current_time: f64,
}

/// Options sent with `startProfiler`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfilerOptions {
    /// Sample buffer capacity
    pub entries: u32,
    /// Sampling interval, in milliseconds
    pub interval: f64,
    /// Enabled instrumentation features
    pub features: Vec<String>,
}

impl Default for ProfilerOptions {
    fn default() -> Self {
        Self {
            entries: 1_000_000,
            interval: 1.0,
            features: vec!["js".to_string()],
        }
    }
}

/// Reply to `getProfile`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfilerData {
    /// Profiler clock when the profile was taken, in milliseconds
    pub current_time: f64,
    /// Captured profile
    pub profile: Profile,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Profile body
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    #[serde(default)]
    pub threads: Vec<ThreadProfile>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Samples captured on one thread
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ThreadProfile {
    #[serde(default)]
    pub samples: Vec<Sample>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Single profiler sample
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    /// Sample timestamp, in milliseconds
    pub time: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Sample {
    pub fn at(time: f64) -> Self {
        Self {
            time,
            extra: Map::new(),
        }
    }
}

impl ProfilerData {
    /// Samples of the first thread, if the profile has any thread
    pub fn first_thread_samples(&self) -> Option<&[Sample]> {
        self.profile
            .threads
            .first()
            .map(|thread| thread.samples.as_slice())
    }

    pub fn first_thread_samples_mut(&mut self) -> Option<&mut Vec<Sample>> {
        self.profile
            .threads
            .first_mut()
            .map(|thread| &mut thread.samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_options() {
        let options = ProfilerOptions::default();
        assert_eq!(options.entries, 1_000_000);
        assert_eq!(options.interval, 1.0);
        assert_eq!(options.features, vec!["js"]);
    }

    #[test]
    fn test_profiler_data_keeps_unknown_fields() {
        let raw = json!({
            "from": "conn0.profiler1",
            "currentTime": 42.0,
            "profile": {
                "meta": {"version": 2},
                "threads": [
                    {"name": "Gecko", "samples": [{"time": 1.5, "frames": [{"location": "(root)"}]}]}
                ]
            }
        });

        let data: ProfilerData = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(data.current_time, 42.0);
        assert_eq!(data.first_thread_samples().unwrap()[0].time, 1.5);

        let back = serde_json::to_value(&data).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_is_active_reply() {
        let reply: IsActiveReply =
            serde_json::from_value(json!({"isActive": true, "currentTime": 300.0})).unwrap();
        assert!(reply.is_active);
        assert_eq!(reply.current_time, 300.0);
    }
}
