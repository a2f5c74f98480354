//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Event error: {0}")]
    Events(#[from] clipx_events::EventError),

    #[error("Tag filter error: {0}")]
    TagFilter(#[from] clipx_models::TagFilterError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Check if the run was rejected because of its inputs rather than a
    /// runtime failure.
    pub fn is_config_error(&self) -> bool {
        match self {
            PipelineError::ConfigError(_) | PipelineError::TagFilter(_) => true,
            PipelineError::Events(e) => e.is_config_error(),
            PipelineError::Io(_) | PipelineError::Json(_) => false,
        }
    }
}
