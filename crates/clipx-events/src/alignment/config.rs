//! Configuration for scene boundary alignment.

use serde::{Deserialize, Serialize};

use crate::error::{EventError, EventResult};

/// Configuration for snapping scene boundaries to detector events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentConfig {
    /// Events scoring below this are never used as boundaries (0.0-1.0).
    pub min_score: f64,

    /// Upper bound on scene length when an end boundary falls back to the
    /// scene's own end. `None` disables the cap.
    pub duration_max: Option<f64>,

    /// Allow a missed boundary to be searched for on the opposite side.
    ///
    /// Flipping can shrink a scene toward its interior; disable it to keep
    /// unmatched boundaries where they are.
    pub allow_flip: bool,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            min_score: 0.6,
            duration_max: None,
            allow_flip: true,
        }
    }
}

impl AlignmentConfig {
    /// Check that the parameters are usable.
    pub fn validate(&self) -> EventResult<()> {
        if !self.min_score.is_finite() {
            return Err(EventError::invalid_config("alignment min_score must be finite"));
        }
        if let Some(max) = self.duration_max {
            if !max.is_finite() || max <= 0.0 {
                return Err(EventError::invalid_config(format!(
                    "duration_max must be positive, got {}",
                    max
                )));
            }
        }
        Ok(())
    }

    /// Builder-style setter for the minimum event score.
    pub fn with_min_score(mut self, score: f64) -> Self {
        self.min_score = score;
        self
    }

    /// Builder-style setter for the duration cap; non-positive disables it.
    pub fn with_duration_max(mut self, secs: f64) -> Self {
        self.duration_max = (secs > 0.0).then_some(secs);
        self
    }

    /// Builder-style setter for flipping.
    pub fn with_allow_flip(mut self, allow: bool) -> Self {
        self.allow_flip = allow;
        self
    }
}
