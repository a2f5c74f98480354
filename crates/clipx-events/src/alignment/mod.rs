//! Scene boundary alignment.
//!
//! Refines rough scene bounds so that starts land on detector events that
//! begin at or before them and ends on events that finish at or after them.

mod aligner;
mod config;
mod search;

pub use aligner::{Alignment, AlignmentReport, MatchCounts, SceneAligner};
pub use config::AlignmentConfig;
pub use search::{BoundaryIndex, BoundaryMatch, BoundarySearcher, Direction, MatchKind};
