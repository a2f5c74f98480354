//! Extraction results and their JSON export.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clipx_models::Scene;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::PipelineResult;

/// File name written into the result directory.
pub const RESULT_FILE: &str = "data.json";

/// Provenance of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
    pub version: String,
    pub extractor: String,
    /// Content path the scenes refer to
    pub input: String,
    pub timestamp: DateTime<Utc>,
}

impl RunInfo {
    /// Describe a run of this build over `input`.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            extractor: env!("CARGO_PKG_NAME").to_string(),
            input: input.into(),
            timestamp: Utc::now(),
        }
    }
}

/// One exported scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    #[serde(flatten)]
    pub scene: Scene,

    /// Filter used for alignment, if any
    pub alignment_type: Option<String>,

    /// Filter used for segmentation
    pub event_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snack_id: Option<i64>,
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionOutput {
    pub config: RunInfo,
    pub results: Vec<SceneRecord>,
}

impl ExtractionOutput {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// `(start, stop)` pairs in output order.
    pub fn time_pairs(&self) -> Vec<(f64, f64)> {
        self.results.iter().map(|r| r.scene.bounds()).collect()
    }

    /// Write `data.json` into `dir`, creating it if needed.
    pub fn write_json(&self, dir: &Path) -> PipelineResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(RESULT_FILE);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        info!(path = %path.display(), scenes = self.results.len(), "Wrote extraction results");
        Ok(path)
    }

    /// Read a previously written result file.
    pub fn read_json(path: &Path) -> PipelineResult<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipx_models::EventRecord;

    fn output() -> ExtractionOutput {
        let mut aligned = Scene::new(8.0, 41.0);
        aligned.event_begin = Some(EventRecord::new(8.0, 18.0, "cut", "shot", "shot", 0.9));
        ExtractionOutput {
            config: RunInfo::new("/media/show.mp4"),
            results: vec![
                SceneRecord {
                    scene: aligned,
                    alignment_type: Some("shot".into()),
                    event_type: "transcript".into(),
                    snack_id: Some(3),
                },
                SceneRecord {
                    scene: Scene::new(50.0, 60.0),
                    alignment_type: None,
                    event_type: "transcript".into(),
                    snack_id: None,
                },
            ],
        }
    }

    #[test]
    fn test_time_pairs() {
        assert_eq!(output().time_pairs(), vec![(8.0, 41.0), (50.0, 60.0)]);
    }

    #[test]
    fn test_record_is_flat() {
        let json = serde_json::to_value(&output()).unwrap();
        let first = &json["results"][0];
        assert_eq!(first["time_begin"], 8.0);
        assert_eq!(first["event_begin"]["tag"], "cut");
        assert!(first["event_end"].is_null());
        assert_eq!(first["alignment_type"], "shot");
        assert_eq!(first["snack_id"], 3);
        assert!(json["results"][1].get("snack_id").is_none());
        assert_eq!(json["config"]["extractor"], "clipx-pipeline");
    }

    #[test]
    fn test_write_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/results");
        let original = output();

        let path = original.write_json(&target).unwrap();
        assert_eq!(path, target.join(RESULT_FILE));

        let restored = ExtractionOutput::read_json(&path).unwrap();
        assert_eq!(restored.time_pairs(), original.time_pairs());
        assert_eq!(restored.results[0].snack_id, Some(3));
    }
}
