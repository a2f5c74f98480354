//! Stage-tagged logging for extraction runs.
//!
//! A run moves through `scenes`, `segmentation`, `alignment` and `export`.
//! Every line written through [`RunLogger`] names the content it works on
//! and the stage it came from, so a JSON log can be filtered per stage.

use clipx_models::Scene;
use tracing::{error, info, warn, Span};

macro_rules! stage_event {
    ($level:ident, $logger:expr, $kind:literal, $message:expr) => {
        $level!(
            content = %$logger.content,
            stage = %$logger.stage,
            "{} {}: {}",
            $logger.stage,
            $kind,
            $message
        )
    };
}

/// Logger bound to one content path and one pipeline stage.
#[derive(Debug, Clone)]
pub struct RunLogger {
    content: String,
    stage: String,
}

impl RunLogger {
    pub fn new(content: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            stage: stage.into(),
        }
    }

    /// Hand the run over to the next stage.
    pub fn for_stage(&self, stage: impl Into<String>) -> Self {
        Self {
            content: self.content.clone(),
            stage: stage.into(),
        }
    }

    pub fn log_start(&self, message: &str) {
        stage_event!(info, self, "begin", message);
    }

    pub fn log_progress(&self, message: &str) {
        stage_event!(info, self, "step", message);
    }

    pub fn log_warning(&self, message: &str) {
        stage_event!(warn, self, "note", message);
    }

    pub fn log_error(&self, message: &str) {
        stage_event!(error, self, "abort", message);
    }

    pub fn log_completion(&self, message: &str) {
        stage_event!(info, self, "done", message);
    }

    /// Dump one scene with its bounding events. `label` is `PRE` before
    /// alignment and `POST` after.
    pub fn log_scene(&self, label: &str, idx: usize, scene: &Scene) {
        info!(
            content = %self.content,
            stage = %self.stage,
            scene = idx,
            time_begin = scene.time_begin,
            time_end = scene.time_end,
            event_begin = scene.event_begin.as_ref().map(|e| e.tag.as_str()),
            event_end = scene.event_end.as_ref().map(|e| e.tag.as_str()),
            "[{}-Scene {}]: START {:.3} - END {:.3}",
            label,
            idx,
            scene.time_begin,
            scene.time_end
        );
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    /// Span covering the whole extraction of one content path.
    pub fn create_span(&self) -> Span {
        tracing::info_span!("extract", content = %self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_binds_content_and_stage() {
        let logger = RunLogger::new("/media/show.mp4", "segmentation");
        assert_eq!(logger.content(), "/media/show.mp4");
        assert_eq!(logger.stage(), "segmentation");
    }

    #[test]
    fn test_for_stage_keeps_content() {
        let logger = RunLogger::new("/media/show.mp4", "scenes").for_stage("alignment");
        assert_eq!(logger.content(), "/media/show.mp4");
        assert_eq!(logger.stage(), "alignment");
    }

    #[test]
    fn test_logging_without_subscriber() {
        let logger = RunLogger::new("/media/show.mp4", "alignment");
        let _guard = logger.create_span().entered();
        logger.log_scene("PRE", 0, &Scene::new(1.0, 2.0));
        logger.log_warning("nothing to align");
        logger.log_completion("0 scenes");
    }
}
