//! Nearest-boundary search with flip and fallback.
//!
//! A scene start is snapped to the latest event starting at or before it;
//! a scene end to the earliest event ending at or after it. When nothing
//! qualifies on the required side the search recovers locally:
//!
//! 1. **Flip**: collapse the scene to the missed boundary and search once in
//!    the opposite direction (never recursing further).
//! 2. **Fallback**: look for the same-side boundary in a secondary event set.
//! 3. If both produced a candidate, the one closer to the original scene's
//!    midpoint wins; on an exact tie the flip is kept.
//! 4. Otherwise the boundary stays where it was (ends capped by the
//!    maximum duration) with no matched event.
//!
//! Both comparisons are inclusive: a scene whose bounds already sit on
//! event boundaries must align to itself, so realigning is a no-op.

use clipx_models::EventRecord;

/// Which side of the target a boundary is searched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// At or before the target, matched on `time_begin` (scene starts).
    Earlier,
    /// At or after the target, matched on `time_end` (scene ends).
    Later,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Earlier => Direction::Later,
            Direction::Later => Direction::Earlier,
        }
    }

    /// The event field compared in this direction.
    pub fn boundary_of(self, event: &EventRecord) -> f64 {
        match self {
            Direction::Earlier => event.time_begin,
            Direction::Later => event.time_end,
        }
    }
}

/// Events eligible as boundaries, sorted once per side.
///
/// The two views are independent: one event may start one scene and end
/// another.
#[derive(Debug, Clone, Default)]
pub struct BoundaryIndex {
    by_begin: Vec<EventRecord>,
    by_end: Vec<EventRecord>,
}

impl BoundaryIndex {
    /// Index events scoring at least `min_score`.
    pub fn new(events: &[EventRecord], min_score: f64) -> Self {
        let eligible: Vec<EventRecord> = events
            .iter()
            .filter(|e| e.score >= min_score && e.time_begin.is_finite() && e.time_end.is_finite())
            .cloned()
            .collect();

        let mut by_begin = eligible.clone();
        by_begin.sort_by(|a, b| a.time_begin.total_cmp(&b.time_begin));
        let mut by_end = eligible;
        by_end.sort_by(|a, b| a.time_end.total_cmp(&b.time_end));

        Self { by_begin, by_end }
    }

    /// Number of eligible events.
    pub fn len(&self) -> usize {
        self.by_begin.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_begin.is_empty()
    }

    /// Nearest eligible event on the given side of `target`.
    pub fn nearest(&self, target: f64, direction: Direction) -> Option<&EventRecord> {
        match direction {
            Direction::Earlier => {
                let idx = self.by_begin.partition_point(|e| e.time_begin <= target);
                idx.checked_sub(1).and_then(|i| self.by_begin.get(i))
            }
            Direction::Later => {
                let idx = self.by_end.partition_point(|e| e.time_end < target);
                self.by_end.get(idx)
            }
        }
    }
}

/// How a boundary was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// Primary event on the requested side.
    Found,
    /// Event found by searching the opposite side.
    Flipped,
    /// Event from the fallback set.
    Fallback,
    /// No event; the scene's own boundary was kept.
    Default,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Found => "found",
            MatchKind::Flipped => "flipped",
            MatchKind::Fallback => "fallback",
            MatchKind::Default => "default",
        }
    }
}

/// A resolved boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryMatch {
    /// Resolved time in seconds
    pub time: f64,
    /// Matched event, absent for [`MatchKind::Default`]
    pub event: Option<EventRecord>,
    pub kind: MatchKind,
}

impl BoundaryMatch {
    fn from_event(event: &EventRecord, direction: Direction, kind: MatchKind) -> Self {
        Self {
            time: direction.boundary_of(event),
            event: Some(event.clone()),
            kind,
        }
    }
}

/// Boundary search over a primary and optional fallback index.
#[derive(Debug, Clone, Copy)]
pub struct BoundarySearcher<'a> {
    primary: &'a BoundaryIndex,
    fallback: Option<&'a BoundaryIndex>,
    duration_max: Option<f64>,
}

impl<'a> BoundarySearcher<'a> {
    pub fn new(primary: &'a BoundaryIndex) -> Self {
        Self {
            primary,
            fallback: None,
            duration_max: None,
        }
    }

    /// Builder-style setter for the fallback index.
    pub fn with_fallback(mut self, fallback: Option<&'a BoundaryIndex>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Builder-style setter for the end-boundary duration cap.
    pub fn with_duration_max(mut self, duration_max: Option<f64>) -> Self {
        self.duration_max = duration_max;
        self
    }

    /// Resolve one boundary of the interval `[time_begin, time_end]`.
    ///
    /// `Earlier` resolves the start, `Later` the end.
    pub fn search(
        &self,
        time_begin: f64,
        time_end: f64,
        direction: Direction,
        allow_flip: bool,
    ) -> BoundaryMatch {
        let target = match direction {
            Direction::Earlier => time_begin,
            Direction::Later => time_end,
        };

        if let Some(event) = self.primary.nearest(target, direction) {
            return BoundaryMatch::from_event(event, direction, MatchKind::Found);
        }

        let flipped = if allow_flip {
            let proposal = self.search(target, target, direction.opposite(), false);
            (proposal.kind != MatchKind::Default).then_some(BoundaryMatch {
                kind: MatchKind::Flipped,
                ..proposal
            })
        } else {
            None
        };

        let fallback = self
            .fallback
            .and_then(|index| index.nearest(target, direction))
            .map(|event| BoundaryMatch::from_event(event, direction, MatchKind::Fallback));

        match (flipped, fallback) {
            (Some(flip), Some(fallback)) => {
                let center = (time_begin + time_end) / 2.0;
                if (center - fallback.time).abs() < (center - flip.time).abs() {
                    fallback
                } else {
                    flip
                }
            }
            (Some(flip), None) => flip,
            (None, Some(fallback)) => fallback,
            (None, None) => BoundaryMatch {
                time: self.default_time(time_begin, time_end, direction),
                event: None,
                kind: MatchKind::Default,
            },
        }
    }

    fn default_time(&self, time_begin: f64, time_end: f64, direction: Direction) -> f64 {
        match direction {
            Direction::Earlier => time_begin,
            Direction::Later => match self.duration_max {
                Some(max) => time_end.min(time_begin + max),
                None => time_end,
            },
        }
    }
}
