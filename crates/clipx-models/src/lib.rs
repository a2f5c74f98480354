//! Shared data models for clip extraction.
//!
//! This crate provides Serde-serializable types for:
//! - Detector events (faces, speech, transcript lines, shot boundaries)
//! - Scene intervals, before and after boundary alignment
//! - Tag-type filters used to query detector outputs

pub mod event;
pub mod filter;
pub mod scene;

// Re-export common types
pub use event::{EventRecord, GroupKey};
pub use filter::{EventQuery, TagFilterError, TagTypeFilter};
pub use scene::Scene;
