//! Configuration for the recording front

use devtools_types::ProfilerOptions;
use serde::{Deserialize, Serialize};

/// Preference gating memory sampling on the timeline actor
pub const SHOW_TIMELINE_MEMORY_PREF: &str = "devtools.performance.ui.show-timeline-memory";

/// Configuration for the recording front
///
/// Holds the options sent to the built-in profiler when a recording has to
/// activate it, and the fallback used when the memory preference is unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceConfig {
    /// Options sent with `startProfiler`
    profiler_options: ProfilerOptions,

    /// Memory sampling when the preference has never been written
    show_timeline_memory_default: bool,
}

impl PerformanceConfig {
    /// Create a new builder for PerformanceConfig
    ///
    /// # Example
    ///
    /// ```
    /// use performance::PerformanceConfig;
    ///
    /// let config = PerformanceConfig::builder()
    ///     .entries(5000)
    ///     .interval(0.5)
    ///     .build();
    /// assert_eq!(config.profiler_options().entries, 5000);
    /// ```
    pub fn builder() -> PerformanceConfigBuilder {
        PerformanceConfigBuilder::default()
    }

    /// Get the profiler activation options
    pub fn profiler_options(&self) -> &ProfilerOptions {
        &self.profiler_options
    }

    /// Get the memory sampling fallback
    pub fn show_timeline_memory_default(&self) -> bool {
        self.show_timeline_memory_default
    }
}

impl Default for PerformanceConfig {
    /// Default values:
    /// - entries: 1000000
    /// - interval: 1 ms
    /// - features: ["js"]
    /// - show_timeline_memory_default: false
    fn default() -> Self {
        Self {
            profiler_options: ProfilerOptions::default(),
            show_timeline_memory_default: false,
        }
    }
}

/// Builder for PerformanceConfig
#[derive(Debug, Clone, Default)]
pub struct PerformanceConfigBuilder {
    entries: Option<u32>,
    interval: Option<f64>,
    features: Vec<String>,
    show_timeline_memory_default: Option<bool>,
}

impl PerformanceConfigBuilder {
    /// Set the sample buffer capacity
    pub fn entries(mut self, entries: u32) -> Self {
        self.entries = Some(entries);
        self
    }

    /// Set the sampling interval in milliseconds
    pub fn interval(mut self, interval: f64) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Add an instrumentation feature
    ///
    /// Any feature given replaces the default feature set.
    pub fn feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }

    /// Set the memory sampling fallback
    pub fn show_timeline_memory_default(mut self, enabled: bool) -> Self {
        self.show_timeline_memory_default = Some(enabled);
        self
    }

    /// Build the PerformanceConfig
    ///
    /// Uses default values for any options not explicitly set.
    pub fn build(self) -> PerformanceConfig {
        let default = PerformanceConfig::default();
        let defaults = default.profiler_options;

        let mut features = defaults.features;
        if !self.features.is_empty() {
            features = self.features;
        }

        PerformanceConfig {
            profiler_options: ProfilerOptions {
                entries: self.entries.unwrap_or(defaults.entries),
                interval: self.interval.unwrap_or(defaults.interval),
                features,
            },
            show_timeline_memory_default: self
                .show_timeline_memory_default
                .unwrap_or(default.show_timeline_memory_default),
        }
    }
}
