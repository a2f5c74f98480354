//! Scene interval models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{EventRecord, GroupKey};

/// A candidate clip interval.
///
/// Scenes come from event segmentation (with `score` and `group`), from
/// fixed clip bounds, or from a scene-list file. Alignment replaces the
/// times and attaches the matched events; an absent event means the
/// boundary was not snapped to any detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Scene {
    /// Start time in seconds
    pub time_begin: f64,

    /// End time in seconds
    pub time_end: f64,

    /// Average confidence over the detected run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    /// Detector group the scene was segmented from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupKey>,

    /// Event the start was aligned to
    #[serde(default)]
    pub event_begin: Option<EventRecord>,

    /// Event the end was aligned to
    #[serde(default)]
    pub event_end: Option<EventRecord>,
}

impl Scene {
    /// Create a scene with fixed bounds.
    pub fn new(time_begin: f64, time_end: f64) -> Self {
        Self {
            time_begin,
            time_end,
            score: None,
            group: None,
            event_begin: None,
            event_end: None,
        }
    }

    /// Create a scene produced by segmenting a detector group.
    pub fn detected(time_begin: f64, time_end: f64, score: f64, group: GroupKey) -> Self {
        Self {
            score: Some(score),
            group: Some(group),
            ..Self::new(time_begin, time_end)
        }
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.time_end - self.time_begin
    }

    /// Center of the interval in seconds.
    pub fn midpoint(&self) -> f64 {
        (self.time_begin + self.time_end) / 2.0
    }

    /// Whether either boundary was snapped to an event.
    pub fn is_aligned(&self) -> bool {
        self.event_begin.is_some() || self.event_end.is_some()
    }

    /// The `(start, stop)` pair handed to clip cutting.
    pub fn bounds(&self) -> (f64, f64) {
        (self.time_begin, self.time_end)
    }
}
