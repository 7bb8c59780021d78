//! Profiler sample post-processing
//!
//! The built-in profiler is shared by the whole process and may have been
//! running long before a recording started, so samples are clipped to the
//! recording window and re-based onto its start. Only the first thread is
//! touched.

use devtools_types::ProfilerData;
use tracing::debug;

/// Drop every first-thread sample older than `start_time` (milliseconds)
pub fn filter_samples(profiler_data: &mut ProfilerData, start_time: f64) {
    match profiler_data.first_thread_samples_mut() {
        Some(samples) => {
            let before = samples.len();
            samples.retain(|sample| sample.time >= start_time);
            debug!(
                "Filtered {} of {} samples older than {}",
                before - samples.len(),
                before,
                start_time
            );
        }
        None => debug!("Profile has no threads, nothing to filter"),
    }
}

/// Shift every first-thread sample back by `time_offset` (milliseconds)
pub fn offset_sample_times(profiler_data: &mut ProfilerData, time_offset: f64) {
    if let Some(samples) = profiler_data.first_thread_samples_mut() {
        for sample in samples.iter_mut() {
            sample.time -= time_offset;
        }
    }
}
