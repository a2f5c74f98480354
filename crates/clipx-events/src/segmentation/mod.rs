//! Scene detection from detector confidence.
//!
//! # Usage
//!
//! ```rust,ignore
//! use clipx_events::segmentation::{EventSegmenter, SegmentationConfig};
//!
//! let config = SegmentationConfig::default()
//!     .with_score_threshold(0.8)
//!     .with_duration_threshold(10.0)
//!     .with_duration_expand(3.0);
//! let segmenter = EventSegmenter::new(config)?;
//! let segmentation = segmenter.segment(&events);
//! for scene in &segmentation.scenes {
//!     println!("{:.2}-{:.2}", scene.time_begin, scene.time_end);
//! }
//! ```

mod config;
mod segmenter;

pub use config::{PeakMethod, SegmentationConfig};
pub use segmenter::{group_events, EventSegmenter, GroupSummary, Segmentation, SegmentationReport};
