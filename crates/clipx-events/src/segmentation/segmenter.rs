//! Detector-group segmentation.
//!
//! Each detector group is resampled onto a regular grid, thresholded into
//! an on/off mask, and run-length encoded. Runs that are "on" and long
//! enough become scenes.
//!
//! ```text
//! events ──► group by (tag, source, type) ──► resample ──► mask ──► RLE ──► scenes
//! ```

use std::collections::BTreeMap;

use clipx_models::{EventRecord, GroupKey, Scene};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::config::{PeakMethod, SegmentationConfig};
use crate::error::EventResult;
use crate::resample::{ScoreSample, TemporalResampler, TimeBucket};
use crate::rle::run_length_encode;

/// Per-group outcome of a segmentation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub key: GroupKey,
    /// Events in the group
    pub event_count: usize,
    /// Buckets in the resampled grid
    pub bucket_count: usize,
    /// Scenes emitted for the group
    pub scene_count: usize,
}

/// Diagnostics returned alongside segmented scenes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentationReport {
    /// One entry per detector group, in group order
    pub groups: Vec<GroupSummary>,
    /// Conditions worth surfacing to the operator
    pub warnings: Vec<String>,
}

impl SegmentationReport {
    /// Total scenes across all groups.
    pub fn total_scenes(&self) -> usize {
        self.groups.iter().map(|g| g.scene_count).sum()
    }

    /// Groups that produced no scene.
    pub fn empty_groups(&self) -> impl Iterator<Item = &GroupSummary> {
        self.groups.iter().filter(|g| g.scene_count == 0)
    }
}

/// Scenes plus diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Segmentation {
    /// Scenes grouped by detector group; chronological within a group
    pub scenes: Vec<Scene>,
    pub report: SegmentationReport,
}

impl Segmentation {
    /// True when segmentation ran but found nothing.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

/// Partition events by detector group.
///
/// Events inside each group keep their input order.
pub fn group_events(events: &[EventRecord]) -> BTreeMap<GroupKey, Vec<&EventRecord>> {
    let mut groups: BTreeMap<GroupKey, Vec<&EventRecord>> = BTreeMap::new();
    for event in events {
        groups.entry(event.group_key()).or_default().push(event);
    }
    groups
}

/// Converts detector events into candidate scenes.
#[derive(Debug, Clone)]
pub struct EventSegmenter {
    config: SegmentationConfig,
    resampler: TemporalResampler,
}

impl EventSegmenter {
    /// Create a segmenter; fails on an unusable configuration.
    pub fn new(config: SegmentationConfig) -> EventResult<Self> {
        config.validate()?;
        let resampler = TemporalResampler::new(config.duration_expand)?;
        Ok(Self { config, resampler })
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Segment every detector group.
    ///
    /// Groups are independent and processed in parallel; results are
    /// collected in group order, so output never depends on scheduling.
    pub fn segment(&self, events: &[EventRecord]) -> Segmentation {
        let groups: Vec<(GroupKey, Vec<&EventRecord>)> = group_events(events).into_iter().collect();

        if groups.is_empty() {
            warn!("No detector groups to segment");
            return Segmentation {
                scenes: Vec::new(),
                report: SegmentationReport {
                    groups: Vec::new(),
                    warnings: vec!["no detector groups found".to_string()],
                },
            };
        }

        let per_group: Vec<(GroupSummary, Vec<Scene>)> = groups
            .par_iter()
            .map(|(key, group)| self.segment_group(key, group))
            .collect();

        let mut segmentation = Segmentation::default();
        for (summary, scenes) in per_group {
            segmentation.scenes.extend(scenes);
            segmentation.report.groups.push(summary);
        }

        if segmentation.scenes.is_empty() {
            segmentation.report.warnings.push(format!(
                "no run above score {} lasted {}s in any of {} groups",
                self.config.score_threshold,
                self.config.duration_threshold,
                segmentation.report.groups.len()
            ));
        }

        info!(
            groups = segmentation.report.groups.len(),
            scenes = segmentation.scenes.len(),
            method = %self.config.peak_method,
            "Segmentation complete"
        );

        segmentation
    }

    /// Segment a single detector group.
    pub fn segment_group(&self, key: &GroupKey, events: &[&EventRecord]) -> (GroupSummary, Vec<Scene>) {
        let samples: Vec<ScoreSample> = events
            .iter()
            .map(|e| ScoreSample {
                time_begin: e.time_begin,
                time_end: e.time_end,
                score: e.score,
            })
            .collect();
        let buckets = self.resampler.resample(&samples);

        let scenes = match self.config.peak_method {
            PeakMethod::Rle => self.scenes_from_runs(key, &buckets),
        };

        debug!(
            group = %key,
            events = events.len(),
            buckets = buckets.len(),
            scenes = scenes.len(),
            "Segmented detector group"
        );

        let summary = GroupSummary {
            key: key.clone(),
            event_count: events.len(),
            bucket_count: buckets.len(),
            scene_count: scenes.len(),
        };
        (summary, scenes)
    }

    fn scenes_from_runs(&self, key: &GroupKey, buckets: &[TimeBucket]) -> Vec<Scene> {
        let mask: Vec<bool> = buckets
            .iter()
            .map(|b| b.score > self.config.score_threshold)
            .collect();
        let runs = run_length_encode(&mask);
        let min_run = self.config.min_run_count();

        runs.iter()
            .filter(|&(_, length, &on)| on && length >= min_run)
            .map(|(start, length, _)| {
                // a run ends where the events behind its last bucket end
                let span = &buckets[start..start + length];
                let score = span.iter().map(|b| b.score).sum::<f64>() / span.len() as f64;
                Scene::detected(span[0].time_begin, span[span.len() - 1].time_end, score, key.clone())
            })
            .collect()
    }
}
