//! Scene detection and boundary alignment over detector events.
//!
//! This crate provides:
//! - Run-length encoding of arbitrary value sequences
//! - Two-pass temporal resampling onto a regular bucket grid
//! - Per-group segmentation of detector confidence into scenes
//! - Nearest-boundary search with flip and fallback recovery
//! - Scene-list parsing and the event source abstraction

pub mod alignment;
pub mod error;
pub mod resample;
pub mod rle;
pub mod scene_list;
pub mod segmentation;
pub mod source;

pub use alignment::{
    Alignment, AlignmentConfig, AlignmentReport, BoundaryIndex, BoundaryMatch, BoundarySearcher,
    Direction, MatchCounts, MatchKind, SceneAligner,
};
pub use error::{EventError, EventResult};
pub use resample::{ScoreSample, TemporalResampler, TimeBucket};
pub use rle::{run_length_encode, RunLengths};
pub use scene_list::{load_scene_list, parse_scene_list};
pub use segmentation::{
    group_events, EventSegmenter, GroupSummary, PeakMethod, Segmentation, SegmentationConfig,
    SegmentationReport,
};
pub use source::{EventSource, MemoryEventSource};
