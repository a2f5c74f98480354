//! Scene alignment against a boundary event set.

use clipx_models::{EventRecord, Scene};
use tracing::{debug, info, warn};

use super::config::AlignmentConfig;
use super::search::{BoundaryIndex, BoundarySearcher, Direction, MatchKind};
use crate::error::EventResult;

/// How many boundaries resolved each way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchCounts {
    pub found: usize,
    pub flipped: usize,
    pub fallback: usize,
    pub default: usize,
}

impl MatchCounts {
    fn record(&mut self, kind: MatchKind) {
        match kind {
            MatchKind::Found => self.found += 1,
            MatchKind::Flipped => self.flipped += 1,
            MatchKind::Fallback => self.fallback += 1,
            MatchKind::Default => self.default += 1,
        }
    }

    /// Boundaries matched to any event.
    pub fn matched(&self) -> usize {
        self.found + self.flipped + self.fallback
    }

    pub fn total(&self) -> usize {
        self.matched() + self.default
    }

    /// Counts keyed by kind, in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (MatchKind, usize)> {
        [
            (MatchKind::Found, self.found),
            (MatchKind::Flipped, self.flipped),
            (MatchKind::Fallback, self.fallback),
            (MatchKind::Default, self.default),
        ]
        .into_iter()
    }
}

/// Diagnostics returned alongside aligned scenes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignmentReport {
    /// Primary events at or above the minimum score
    pub primary_candidates: usize,
    /// Fallback events at or above the minimum score
    pub fallback_candidates: usize,
    pub begin_matches: MatchCounts,
    pub end_matches: MatchCounts,
    /// Scenes whose end resolved before their start
    pub clamped: usize,
    pub warnings: Vec<String>,
}

/// Aligned scenes plus diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Alignment {
    /// Same length and order as the input scenes
    pub scenes: Vec<Scene>,
    pub report: AlignmentReport,
}

/// Snaps scene boundaries to high-confidence events.
#[derive(Debug, Clone)]
pub struct SceneAligner {
    config: AlignmentConfig,
    primary: BoundaryIndex,
    fallback: Option<BoundaryIndex>,
}

impl SceneAligner {
    /// Build an aligner over `events`, optionally with a fallback set.
    pub fn new(
        config: AlignmentConfig,
        events: &[EventRecord],
        fallback: Option<&[EventRecord]>,
    ) -> EventResult<Self> {
        config.validate()?;
        let primary = BoundaryIndex::new(events, config.min_score);
        let fallback = fallback.map(|events| BoundaryIndex::new(events, config.min_score));
        Ok(Self {
            config,
            primary,
            fallback,
        })
    }

    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// Align every scene independently, preserving order.
    pub fn align(&self, scenes: &[Scene]) -> Alignment {
        let mut report = AlignmentReport {
            primary_candidates: self.primary.len(),
            fallback_candidates: self.fallback.as_ref().map_or(0, BoundaryIndex::len),
            ..Default::default()
        };

        if self.primary.is_empty() {
            warn!(min_score = self.config.min_score, "No alignment events above minimum score");
            report.warnings.push(format!(
                "no alignment events at or above score {}",
                self.config.min_score
            ));
        }

        let searcher = BoundarySearcher::new(&self.primary)
            .with_fallback(self.fallback.as_ref())
            .with_duration_max(self.config.duration_max);

        let aligned = scenes
            .iter()
            .enumerate()
            .map(|(idx, scene)| {
                let begin = searcher.search(
                    scene.time_begin,
                    scene.time_end,
                    Direction::Earlier,
                    self.config.allow_flip,
                );
                let end = searcher.search(
                    scene.time_begin,
                    scene.time_end,
                    Direction::Later,
                    self.config.allow_flip,
                );
                report.begin_matches.record(begin.kind);
                report.end_matches.record(end.kind);

                let mut time_end = end.time;
                if time_end < begin.time {
                    report.clamped += 1;
                    report.warnings.push(format!(
                        "scene {} end {:.3}s resolved before start {:.3}s; clamped",
                        idx, end.time, begin.time
                    ));
                    time_end = begin.time;
                }

                debug!(
                    scene = idx,
                    begin = begin.time,
                    end = time_end,
                    begin_kind = begin.kind.as_str(),
                    end_kind = end.kind.as_str(),
                    "Aligned scene"
                );

                Scene {
                    time_begin: begin.time,
                    time_end,
                    event_begin: begin.event,
                    event_end: end.event,
                    ..scene.clone()
                }
            })
            .collect();

        info!(
            scenes = scenes.len(),
            begin_matched = report.begin_matches.matched(),
            end_matched = report.end_matches.matched(),
            clamped = report.clamped,
            "Alignment complete"
        );

        Alignment {
            scenes: aligned,
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shot(begin: f64, end: f64, score: f64) -> EventRecord {
        EventRecord::new(begin, end, "cut", "shot", "shot", score)
    }

    fn aligner(events: &[EventRecord]) -> SceneAligner {
        SceneAligner::new(AlignmentConfig::default().with_min_score(0.5), events, None).unwrap()
    }

    #[test]
    fn test_exact_boundaries_are_kept() {
        let events = vec![shot(10.0, 12.0, 0.9), shot(35.0, 40.0, 0.9)];
        let result = aligner(&events).align(&[Scene::new(10.0, 40.0)]);

        let scene = &result.scenes[0];
        assert_eq!(scene.bounds(), (10.0, 40.0));
        assert_eq!(scene.event_begin.as_ref().unwrap().time_begin, 10.0);
        assert_eq!(scene.event_end.as_ref().unwrap().time_end, 40.0);
        assert_eq!(result.report.begin_matches.found, 1);
        assert_eq!(result.report.end_matches.found, 1);
    }

    #[test]
    fn test_boundaries_expand_outward() {
        let events = vec![shot(8.0, 18.0, 0.9), shot(12.0, 41.0, 0.9), shot(50.0, 60.0, 0.9)];
        let result = aligner(&events).align(&[Scene::new(10.0, 40.0)]);

        // start snaps to the last start at or before 10s, end to the first end at or after 40s
        assert_eq!(result.scenes[0].bounds(), (8.0, 41.0));
    }

    #[test]
    fn test_low_score_events_ignored() {
        let events = vec![shot(9.5, 10.5, 0.2), shot(5.0, 45.0, 0.9)];
        let result = aligner(&events).align(&[Scene::new(10.0, 40.0)]);

        assert_eq!(result.scenes[0].bounds(), (5.0, 45.0));
        assert_eq!(result.report.primary_candidates, 1);
    }

    #[test]
    fn test_order_and_metadata_preserved() {
        let events = vec![shot(0.0, 5.0, 0.9), shot(20.0, 25.0, 0.9)];
        let group = shot(0.0, 0.0, 1.0).group_key();
        let scenes = vec![
            Scene::detected(21.0, 24.0, 0.9, group.clone()),
            Scene::new(1.0, 4.0),
        ];
        let result = aligner(&events).align(&scenes);

        assert_eq!(result.scenes.len(), 2);
        assert_eq!(result.scenes[0].bounds(), (20.0, 25.0));
        assert_eq!(result.scenes[0].group, Some(group));
        assert_eq!(result.scenes[0].score, Some(0.9));
        assert_eq!(result.scenes[1].bounds(), (0.0, 5.0));
    }

    #[test]
    fn test_no_events_keeps_scenes_and_warns() {
        let result = aligner(&[]).align(&[Scene::new(3.0, 9.0)]);

        assert_eq!(result.scenes[0].bounds(), (3.0, 9.0));
        assert!(!result.scenes[0].is_aligned());
        assert_eq!(result.report.begin_matches.default, 1);
        assert_eq!(result.report.warnings.len(), 1);
    }

    #[test]
    fn test_inverted_bounds_clamped() {
        let events = vec![shot(30.0, 31.0, 0.9)];
        let config = AlignmentConfig::default().with_min_score(0.5).with_duration_max(5.0);
        let aligner = SceneAligner::new(config, &events, None).unwrap();

        // start flips forward to 31s, end flips back to 30s
        let result = aligner.align(&[Scene::new(10.0, 100.0)]);
        assert_eq!(result.scenes[0].bounds(), (31.0, 31.0));
        assert_eq!(result.report.clamped, 1);
        assert_eq!(result.report.begin_matches.flipped, 1);
        assert_eq!(result.report.end_matches.flipped, 1);
    }

    #[test]
    fn test_fallback_used_when_primary_misses() {
        let events = vec![shot(20.0, 21.0, 0.9)];
        let fallback = vec![shot(2.0, 3.0, 0.9)];
        let config = AlignmentConfig::default().with_min_score(0.5).with_allow_flip(false);
        let aligner = SceneAligner::new(config, &events, Some(&fallback)).unwrap();

        let result = aligner.align(&[Scene::new(5.0, 15.0)]);
        assert_eq!(result.scenes[0].time_begin, 2.0);
        assert_eq!(result.scenes[0].time_end, 21.0);
        assert_eq!(result.report.begin_matches.fallback, 1);
        assert_eq!(result.report.fallback_candidates, 1);
    }
}
