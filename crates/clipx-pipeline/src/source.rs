//! Detector outputs stored as JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use clipx_events::{EventError, EventResult, EventSource};
use clipx_models::{EventQuery, EventRecord};
use tracing::{debug, warn};

/// Reads every `*.json` file in a directory as an array of event records.
///
/// Files are visited in name order. A file that cannot be read or parsed is
/// skipped with a warning, and a missing directory yields no events. A path
/// that exists but cannot be listed as a directory is a source error.
#[derive(Debug, Clone)]
pub struct JsonDirectorySource {
    dir: PathBuf,
}

impl JsonDirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn json_files(&self) -> EventResult<Vec<PathBuf>> {
        if !self.dir.exists() {
            warn!(dir = %self.dir.display(), "Event directory not found");
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| {
            EventError::source(format!("cannot list event directory '{}': {}", self.dir.display(), e))
        })?;
        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();
        Ok(files)
    }

    fn read_file(path: &Path) -> EventResult<Vec<EventRecord>> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl EventSource for JsonDirectorySource {
    fn events(&self, query: &EventQuery) -> EventResult<Vec<EventRecord>> {
        let mut events = Vec::new();
        for path in self.json_files()? {
            match Self::read_file(&path) {
                Ok(records) => {
                    let before = events.len();
                    events.extend(records.into_iter().filter(|e| query.matches(e)));
                    debug!(
                        file = %path.display(),
                        matched = events.len() - before,
                        "Read detector output"
                    );
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Skipping unreadable detector output");
                }
            }
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipx_models::TagTypeFilter;

    fn write_events(dir: &Path, name: &str, events: &[EventRecord]) {
        fs::write(dir.join(name), serde_json::to_string(events).unwrap()).unwrap();
    }

    #[test]
    fn test_reads_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write_events(dir.path(), "b_shots.json", &[EventRecord::new(5.0, 6.0, "cut", "shot", "shot", 0.9)]);
        write_events(dir.path(), "a_shots.json", &[EventRecord::new(1.0, 2.0, "cut", "shot", "shot", 0.9)]);
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let source = JsonDirectorySource::new(dir.path());
        let events = source
            .events(&EventQuery::new(TagTypeFilter::tag_type("shot")))
            .unwrap();
        let begins: Vec<f64> = events.iter().map(|e| e.time_begin).collect();
        assert_eq!(begins, vec![1.0, 5.0]);
    }

    #[test]
    fn test_skips_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        write_events(
            dir.path(),
            "faces.json",
            &[
                EventRecord::new(0.0, 1.0, "alice", "identity", "face", 0.9),
                EventRecord::new(0.0, 1.0, "cut", "shot", "shot", 0.9),
            ],
        );

        let source = JsonDirectorySource::new(dir.path());
        let events = source
            .events(&EventQuery::new(TagTypeFilter::tag_type("identity")))
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tag, "alice");
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonDirectorySource::new(dir.path().join("absent"));
        let events = source
            .events(&EventQuery::new(TagTypeFilter::tag_type("shot")))
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_file_in_place_of_directory_is_source_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let source = JsonDirectorySource::new(file.path());
        let err = source
            .events(&EventQuery::new(TagTypeFilter::tag_type("shot")))
            .unwrap_err();
        assert!(matches!(err, EventError::Source(_)));
        assert!(!err.is_config_error());
    }
}
