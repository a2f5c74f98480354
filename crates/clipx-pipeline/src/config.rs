//! Pipeline configuration.
//!
//! Every setting comes from a `CLIPX_*` environment variable. Unset or
//! unparsable numbers fall back to their defaults; malformed filters,
//! clip bounds and peak methods are rejected.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clipx_events::{AlignmentConfig, PeakMethod, SegmentationConfig};
use clipx_models::TagTypeFilter;

use crate::error::{PipelineError, PipelineResult};

/// A fixed `start,stop` scene. A negative stop counts back from the end of
/// the content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipBounds {
    pub start: f64,
    pub stop: f64,
}

impl FromStr for ClipBounds {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields: Vec<&str> = s.split(',').map(str::trim).collect();
        if fields.len() != 2 {
            fields = s.split_whitespace().collect();
        }
        let values: Vec<f64> = fields
            .iter()
            .filter_map(|f| f.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .collect();

        match values.as_slice() {
            [start, stop] if fields.len() == 2 => Ok(Self {
                start: *start,
                stop: *stop,
            }),
            _ => Err(PipelineError::config_error(format!(
                "clip bounds must be 'start,stop', got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for ClipBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.start, self.stop)
    }
}

/// Full configuration for one extraction run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Input video, recorded in the output
    pub path_content: PathBuf,
    /// Directory receiving `data.json`; `None` disables export
    pub path_result: Option<PathBuf>,
    /// Scene-list file, or a directory of detector outputs
    pub path_scenes: Option<PathBuf>,
    /// Directory of detector outputs
    pub path_events: Option<PathBuf>,
    /// Content length in seconds, when known
    pub content_duration: Option<f64>,
    pub snack_id: Option<i64>,

    /// Events segmented into scenes
    pub event_type: TagTypeFilter,
    pub segmentation: SegmentationConfig,
    /// Scene length cap; `None` disables
    pub duration_max: Option<f64>,
    pub clip_bounds: Option<ClipBounds>,

    /// Events scene boundaries snap to
    pub alignment_type: Option<TagTypeFilter>,
    /// Restrict alignment events to these extractors
    pub alignment_extractors: Vec<String>,
    pub alignment: AlignmentConfig,
    /// Secondary boundary events
    pub finalize_type: Option<TagTypeFilter>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            path_content: PathBuf::new(),
            path_result: None,
            path_scenes: None,
            path_events: None,
            content_duration: None,
            snack_id: None,
            event_type: TagTypeFilter::tag_type("transcript"),
            segmentation: SegmentationConfig::default(),
            duration_max: None,
            clip_bounds: None,
            alignment_type: None,
            alignment_extractors: Vec::new(),
            alignment: AlignmentConfig::default(),
            finalize_type: Some(TagTypeFilter::tag_type("shot")),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> PipelineResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> PipelineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let number = |key: &str, default: f64| {
            text(key)
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(default)
        };

        let defaults = SegmentationConfig::default();
        let peak_method = match text("CLIPX_PEAK_METHOD") {
            Some(method) => method.parse::<PeakMethod>()?,
            None => defaults.peak_method,
        };
        let segmentation = SegmentationConfig::default()
            .with_score_threshold(number("CLIPX_EVENT_MIN_SCORE", defaults.score_threshold))
            .with_duration_threshold(number("CLIPX_DURATION_MIN", defaults.duration_threshold))
            .with_duration_expand(number("CLIPX_EVENT_EXPAND_LENGTH", defaults.duration_expand))
            .with_peak_method(peak_method);

        let duration_max = Some(number("CLIPX_DURATION_MAX", -1.0)).filter(|v| *v > 0.0);
        let alignment = AlignmentConfig {
            min_score: number("CLIPX_ALIGNMENT_MIN_SCORE", AlignmentConfig::default().min_score),
            duration_max,
            allow_flip: !text("CLIPX_ALIGNMENT_NO_SHRINK").is_some_and(|v| parse_flag(&v)),
        };

        let event_type = match text("CLIPX_EVENT_TYPE") {
            Some(filter) => filter.parse::<TagTypeFilter>()?,
            None => TagTypeFilter::tag_type("transcript"),
        };
        let alignment_type = text("CLIPX_ALIGNMENT_TYPE")
            .map(|f| f.parse::<TagTypeFilter>())
            .transpose()?;
        let finalize_type = match lookup("CLIPX_FINALIZE_TYPE") {
            Some(filter) if filter.trim().is_empty() => None,
            Some(filter) => Some(filter.parse::<TagTypeFilter>()?),
            None => Some(TagTypeFilter::tag_type("shot")),
        };
        let alignment_extractors = text("CLIPX_ALIGNMENT_EXTRACTORS")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let config = Self {
            path_content: text("CLIPX_PATH_CONTENT").map(PathBuf::from).unwrap_or_default(),
            path_result: text("CLIPX_PATH_RESULT").map(PathBuf::from),
            path_scenes: text("CLIPX_PATH_SCENES").map(PathBuf::from),
            path_events: text("CLIPX_PATH_EVENTS").map(PathBuf::from),
            content_duration: text("CLIPX_CONTENT_DURATION")
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v > 0.0),
            snack_id: text("CLIPX_SNACK_ID")
                .and_then(|s| s.parse::<i64>().ok())
                .filter(|id| *id >= 0),
            event_type,
            segmentation,
            duration_max,
            clip_bounds: text("CLIPX_CLIP_BOUNDS")
                .map(|b| b.parse::<ClipBounds>())
                .transpose()?,
            alignment_type,
            alignment_extractors,
            alignment,
            finalize_type,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the algorithm parameters.
    pub fn validate(&self) -> PipelineResult<()> {
        self.segmentation.validate()?;
        self.alignment.validate()?;
        Ok(())
    }

    /// Directory holding detector outputs.
    ///
    /// An explicit events directory wins; otherwise a scene path that is a
    /// directory; otherwise the directory containing the content.
    pub fn events_dir(&self) -> PathBuf {
        if let Some(dir) = &self.path_events {
            return dir.clone();
        }
        match &self.path_scenes {
            Some(scenes) if scenes.is_dir() => scenes.clone(),
            _ => self
                .path_content
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
