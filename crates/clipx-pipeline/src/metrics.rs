//! Pipeline metrics.
//!
//! Recorded through the `metrics` facade; without an installed recorder
//! every call is a no-op.

use clipx_events::{AlignmentReport, SegmentationReport};
use clipx_models::Scene;
use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const EVENTS_LOADED_TOTAL: &str = "clipx_events_loaded_total";
    pub const SCENES_DETECTED_TOTAL: &str = "clipx_scenes_detected_total";
    pub const SCENES_ALIGNED_TOTAL: &str = "clipx_scenes_aligned_total";
    pub const BOUNDARY_MATCHES_TOTAL: &str = "clipx_boundary_matches_total";
    pub const SCENE_DURATION_SECONDS: &str = "clipx_scene_duration_seconds";
}

/// Record events loaded for a role (`segmentation`, `alignment`, `fallback`).
pub fn record_events_loaded(role: &str, count: usize) {
    let labels = [("role", role.to_string())];
    counter!(names::EVENTS_LOADED_TOTAL, &labels).increment(count as u64);
}

/// Record the outcome of a segmentation pass.
pub fn record_segmentation(report: &SegmentationReport) {
    counter!(names::SCENES_DETECTED_TOTAL).increment(report.total_scenes() as u64);
}

/// Record the outcome of an alignment pass.
pub fn record_alignment(report: &AlignmentReport, scenes: usize) {
    counter!(names::SCENES_ALIGNED_TOTAL).increment(scenes as u64);

    for (side, counts) in [("begin", &report.begin_matches), ("end", &report.end_matches)] {
        for (kind, count) in counts.iter() {
            let labels = [("side", side.to_string()), ("kind", kind.as_str().to_string())];
            counter!(names::BOUNDARY_MATCHES_TOTAL, &labels).increment(count as u64);
        }
    }
}

/// Record final scene durations.
pub fn record_scene_durations(scenes: &[Scene]) {
    for scene in scenes {
        histogram!(names::SCENE_DURATION_SECONDS).record(scene.duration());
    }
}
