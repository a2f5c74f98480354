//! Error types for segmentation and alignment.

use thiserror::Error;

/// Result type for event operations.
pub type EventResult<T> = Result<T, EventError>;

/// Errors that can occur while building or refining scenes.
///
/// Empty results (no events, no qualifying runs) are not errors; they are
/// reported as empty collections.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Unknown peak-detection method '{0}'")]
    UnsupportedPeakMethod(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed scene list at line {line}: {message}")]
    SceneList { line: usize, message: String },

    #[error("Event source failed: {0}")]
    Source(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl EventError {
    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Create a scene list parse error.
    pub fn scene_list(line: usize, message: impl Into<String>) -> Self {
        Self::SceneList {
            line,
            message: message.into(),
        }
    }

    /// Create an event source error.
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source(message.into())
    }

    /// Whether this error stems from user-supplied configuration or input files.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            EventError::UnsupportedPeakMethod(_)
                | EventError::InvalidConfig(_)
                | EventError::SceneList { .. }
        )
    }
}
