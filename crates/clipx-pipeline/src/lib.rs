//! Clip extraction pipeline.
//!
//! Resolves candidate scenes (fixed bounds, a scene-list file, or detector
//! segmentation), aligns them to detector events and exports the result.

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod output;
pub mod pipeline;
pub mod source;

pub use config::{ClipBounds, PipelineConfig};
pub use error::{PipelineError, PipelineResult};
pub use logging::RunLogger;
pub use output::{ExtractionOutput, RunInfo, SceneRecord, RESULT_FILE};
pub use pipeline::ClipPipeline;
pub use source::JsonDirectorySource;
