//! Detector event models.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single detection produced by a content-analysis extractor.
///
/// Events are immutable once parsed. Instantaneous detections (a face in
/// one frame) have `time_begin == time_end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EventRecord {
    /// Start of the detection in seconds
    pub time_begin: f64,

    /// End of the detection in seconds
    pub time_end: f64,

    /// Representative instant of the detection in seconds
    pub time_event: f64,

    /// Detected label (e.g. a person's name or `speaker_1`)
    pub tag: String,

    /// Category of the label (e.g. `identity`, `shot`, `transcript`)
    pub tag_type: String,

    /// Detector modality that produced the event (e.g. `face`, `speech`)
    pub source_event: String,

    /// Confidence in `[0, 1]`
    pub score: f64,

    /// Name of the extractor that produced the event, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extractor: Option<String>,
}

impl EventRecord {
    /// Create a new event; `time_event` defaults to `time_begin`.
    pub fn new(
        time_begin: f64,
        time_end: f64,
        tag: impl Into<String>,
        tag_type: impl Into<String>,
        source_event: impl Into<String>,
        score: f64,
    ) -> Self {
        Self {
            time_begin,
            time_end,
            time_event: time_begin,
            tag: tag.into(),
            tag_type: tag_type.into(),
            source_event: source_event.into(),
            score,
            extractor: None,
        }
    }

    /// Builder-style setter for the representative instant.
    pub fn with_time_event(mut self, time_event: f64) -> Self {
        self.time_event = time_event;
        self
    }

    /// Builder-style setter for the producing extractor.
    pub fn with_extractor(mut self, extractor: impl Into<String>) -> Self {
        self.extractor = Some(extractor.into());
        self
    }

    /// Duration of the detection in seconds.
    pub fn duration(&self) -> f64 {
        (self.time_end - self.time_begin).max(0.0)
    }

    /// Key of the detector group this event belongs to.
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            tag: self.tag.clone(),
            source_event: self.source_event.clone(),
            tag_type: self.tag_type.clone(),
        }
    }
}

/// Identity of a detector group: events sharing tag, source and tag type.
///
/// Ordering is lexicographic over `(tag, source_event, tag_type)`, which
/// fixes the order in which groups are segmented and reported.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
pub struct GroupKey {
    pub tag: String,
    pub source_event: String,
    pub tag_type: String,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.tag_type, self.source_event, self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults_time_event() {
        let event = EventRecord::new(2.5, 3.0, "Jason Momoa", "identity", "face", 0.9);
        assert_eq!(event.time_event, 2.5);
        assert!(event.extractor.is_none());
        assert!((event.duration() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_group_key_ordering() {
        let a = EventRecord::new(0.0, 0.0, "alice", "identity", "face", 1.0).group_key();
        let b = EventRecord::new(0.0, 0.0, "bob", "identity", "face", 1.0).group_key();
        let a_speech = EventRecord::new(0.0, 0.0, "alice", "identity", "speech", 1.0).group_key();

        assert!(a < b);
        assert!(a < a_speech);
        assert_eq!(a.to_string(), "identity/face/alice");
    }

    #[test]
    fn test_deserialize_without_extractor() {
        let json = r#"{
            "time_begin": 47.7, "time_end": 48.3, "time_event": 47.7,
            "tag": "speaker_1", "tag_type": "identity",
            "source_event": "speech", "score": 0.72644
        }"#;
        let event: EventRecord = serde_json::from_str(json).unwrap();
        assert_eq!(event.tag, "speaker_1");
        assert!(event.extractor.is_none());

        let out = serde_json::to_string(&event).unwrap();
        assert!(!out.contains("extractor"));
    }
}
