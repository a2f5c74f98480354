//! Run orchestration.
//!
//! ```text
//! clip bounds ─┐
//! scene file ──┼──► scenes ──► align (optional) ──► ExtractionOutput ──► data.json
//! segmentation ┘
//! ```
//!
//! Scene sources are tried in that order; the first one that applies wins.

use clipx_events::{load_scene_list, EventSegmenter, EventSource, SceneAligner};
use clipx_models::{EventQuery, Scene, TagTypeFilter};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::RunLogger;
use crate::metrics;
use crate::output::{ExtractionOutput, RunInfo, SceneRecord};
use crate::source::JsonDirectorySource;

/// Scene detection and alignment for one piece of content.
#[derive(Debug, Clone)]
pub struct ClipPipeline<S> {
    config: PipelineConfig,
    source: S,
}

impl ClipPipeline<JsonDirectorySource> {
    /// Pipeline reading detector outputs from the configured events directory.
    pub fn from_config(config: PipelineConfig) -> Self {
        let source = JsonDirectorySource::new(config.events_dir());
        Self::new(config, source)
    }
}

impl<S: EventSource> ClipPipeline<S> {
    pub fn new(config: PipelineConfig, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline and export results when a result directory is set.
    ///
    /// Finding no scenes is not an error: the returned output is empty and
    /// nothing is written.
    pub fn run(&self) -> PipelineResult<ExtractionOutput> {
        let input = self.config.path_content.display().to_string();
        let logger = RunLogger::new(input.clone(), "scenes");
        let _span = logger.create_span().entered();
        logger.log_start("resolving scenes");

        let mut output = ExtractionOutput {
            config: RunInfo::new(input),
            results: Vec::new(),
        };

        let scenes = self.scenes(&logger)?;
        if scenes.is_empty() {
            logger.log_error("no scene sources were provided or found with events, aborting");
            return Ok(output);
        }
        logger.log_progress(&format!(
            "found {} scenes with average length {:.2}s",
            scenes.len(),
            average_duration(&scenes)
        ));

        let alignment_type = self.alignment_type(&logger);
        let scenes = match &alignment_type {
            Some(filter) => self.align(scenes, filter, &logger.for_stage("alignment"))?,
            None => scenes,
        };
        metrics::record_scene_durations(&scenes);

        let alignment_label = alignment_type.as_ref().map(TagTypeFilter::to_string);
        let event_label = self.config.event_type.to_string();
        output.results = scenes
            .into_iter()
            .map(|scene| SceneRecord {
                scene,
                alignment_type: alignment_label.clone(),
                event_type: event_label.clone(),
                snack_id: self.config.snack_id,
            })
            .collect();

        let logger = logger.for_stage("export");
        if let Some(dir) = &self.config.path_result {
            let path = output.write_json(dir)?;
            logger.log_progress(&format!("wrote results to '{}'", path.display()));
        }
        logger.log_completion(&format!("{} scenes", output.results.len()));

        Ok(output)
    }

    /// Resolve the scene list from the highest-priority source available.
    pub fn scenes(&self, logger: &RunLogger) -> PipelineResult<Vec<Scene>> {
        if let Some(bounds) = self.config.clip_bounds {
            let mut scene = self.resolve_stop(Scene::new(bounds.start, bounds.stop))?;
            if let Some(max) = self.config.duration_max {
                scene.time_end = scene.time_end.min(scene.time_begin + max);
            }
            logger.log_progress(&format!("using fixed clip bounds {}", bounds));
            return Ok(vec![scene]);
        }

        if let Some(path) = &self.config.path_scenes {
            if let Some(scenes) = load_scene_list(path)? {
                logger.log_progress(&format!("loaded scene list '{}'", path.display()));
                return scenes.into_iter().map(|s| self.resolve_stop(s)).collect();
            }
        }

        self.segment(&logger.for_stage("segmentation"))
    }

    fn segment(&self, logger: &RunLogger) -> PipelineResult<Vec<Scene>> {
        let segmenter = EventSegmenter::new(self.config.segmentation.clone())?;
        let events = self
            .source
            .events(&EventQuery::new(self.config.event_type.clone()))?;
        metrics::record_events_loaded("segmentation", events.len());

        let segmentation = segmenter.segment(&events);
        for warning in &segmentation.report.warnings {
            logger.log_warning(warning);
        }
        metrics::record_segmentation(&segmentation.report);
        Ok(segmentation.scenes)
    }

    /// The configured alignment type, or the finalize type promoted in its place.
    fn alignment_type(&self, logger: &RunLogger) -> Option<TagTypeFilter> {
        match (&self.config.alignment_type, &self.config.finalize_type) {
            (Some(alignment), _) => Some(alignment.clone()),
            (None, Some(finalize)) => {
                logger.log_warning(&format!(
                    "upgrading finalize type '{}' to alignment type",
                    finalize
                ));
                Some(finalize.clone())
            }
            (None, None) => None,
        }
    }

    fn align(
        &self,
        scenes: Vec<Scene>,
        alignment_type: &TagTypeFilter,
        logger: &RunLogger,
    ) -> PipelineResult<Vec<Scene>> {
        let query = EventQuery::new(alignment_type.clone())
            .with_extractors(self.config.alignment_extractors.clone());
        let events = self.source.events(&query)?;
        metrics::record_events_loaded("alignment", events.len());
        if events.is_empty() {
            logger.log_warning(&format!(
                "no events of alignment type '{}', trimming may have no effect",
                alignment_type
            ));
        }

        let fallback = match &self.config.finalize_type {
            Some(finalize) if finalize != alignment_type => {
                let events = self.source.events(&EventQuery::new(finalize.clone()))?;
                metrics::record_events_loaded("fallback", events.len());
                logger.log_progress(&format!(
                    "alignment boundaries include {} fallback events of type '{}'",
                    events.len(),
                    finalize
                ));
                Some(events)
            }
            _ => None,
        };

        for (idx, scene) in scenes.iter().enumerate() {
            logger.log_scene("PRE", idx, scene);
        }

        let aligner = SceneAligner::new(self.config.alignment.clone(), &events, fallback.as_deref())?;
        let alignment = aligner.align(&scenes);
        for warning in &alignment.report.warnings {
            logger.log_warning(warning);
        }
        metrics::record_alignment(&alignment.report, alignment.scenes.len());

        for (idx, scene) in alignment.scenes.iter().enumerate() {
            logger.log_scene("POST", idx, scene);
        }
        Ok(alignment.scenes)
    }

    /// Turn a negative stop into an offset from the end of the content.
    fn resolve_stop(&self, mut scene: Scene) -> PipelineResult<Scene> {
        if scene.time_end < 0.0 {
            let duration = self.config.content_duration.ok_or_else(|| {
                PipelineError::config_error(format!(
                    "stop {} is relative to the content end but the content duration is unknown",
                    scene.time_end
                ))
            })?;
            scene.time_end += duration;
        }
        if scene.time_end < scene.time_begin {
            return Err(PipelineError::config_error(format!(
                "scene stop {} is before its start {}",
                scene.time_end, scene.time_begin
            )));
        }
        Ok(scene)
    }
}

fn average_duration(scenes: &[Scene]) -> f64 {
    if scenes.is_empty() {
        return 0.0;
    }
    scenes.iter().map(Scene::duration).sum::<f64>() / scenes.len() as f64
}
