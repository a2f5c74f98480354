//! Configuration for event segmentation.
//!
//! These parameters control which stretches of detector confidence
//! become candidate scenes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EventError, EventResult};

/// How qualifying stretches are located in the thresholded grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeakMethod {
    /// Run-length encoding of the threshold mask.
    #[default]
    Rle,
}

impl FromStr for PeakMethod {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rle" => Ok(PeakMethod::Rle),
            other => Err(EventError::UnsupportedPeakMethod(other.to_string())),
        }
    }
}

impl fmt::Display for PeakMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeakMethod::Rle => write!(f, "rle"),
        }
    }
}

/// Configuration for turning detector events into scenes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Buckets scoring strictly above this are "on" (0.0-1.0).
    pub score_threshold: f64,

    /// Minimum duration of a qualifying run, in seconds.
    ///
    /// Converted to a bucket count by flooring
    /// `duration_threshold / duration_expand`.
    pub duration_threshold: f64,

    /// Bucket width in seconds; instantaneous events are expanded to this.
    pub duration_expand: f64,

    /// Peak-detection method.
    pub peak_method: PeakMethod,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.8,
            duration_threshold: 10.0,
            duration_expand: 5.0,
            peak_method: PeakMethod::Rle,
        }
    }
}

impl SegmentationConfig {
    /// Minimum number of consecutive buckets a run needs to become a scene.
    pub fn min_run_count(&self) -> usize {
        (self.duration_threshold / self.duration_expand).floor().max(0.0) as usize
    }

    /// Check that the parameters describe a usable grid.
    pub fn validate(&self) -> EventResult<()> {
        if !self.duration_expand.is_finite() || self.duration_expand <= 0.0 {
            return Err(EventError::invalid_config(format!(
                "duration_expand must be positive, got {}",
                self.duration_expand
            )));
        }
        if !self.duration_threshold.is_finite() {
            return Err(EventError::invalid_config("duration_threshold must be finite"));
        }
        if !self.score_threshold.is_finite() {
            return Err(EventError::invalid_config("score_threshold must be finite"));
        }
        Ok(())
    }

    /// Builder-style setter for the score threshold.
    pub fn with_score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = threshold;
        self
    }

    /// Builder-style setter for the minimum run duration.
    pub fn with_duration_threshold(mut self, secs: f64) -> Self {
        self.duration_threshold = secs;
        self
    }

    /// Builder-style setter for the bucket width.
    pub fn with_duration_expand(mut self, secs: f64) -> Self {
        self.duration_expand = secs;
        self
    }

    /// Builder-style setter for the peak-detection method.
    pub fn with_peak_method(mut self, method: PeakMethod) -> Self {
        self.peak_method = method;
        self
    }
}
