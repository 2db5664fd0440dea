//! Error types for the image pipeline
//!
//! Fatal errors stop the invocation. Per-record failures (downloads, decoding, image
//! uploads) are converted into skipped steps of the run report unless fail-fast is on.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// A required setting is missing or has an invalid value
    #[error("Configuration error: {0}")]
    Config(String),

    /// The candidate request to the photo API failed
    #[error("Failed to fetch image candidates from {url}: {reason}")]
    FetchFailure { url: String, reason: String },

    /// A record in the API response lacks a field the pipeline needs
    #[error("Record {index} has an unexpected shape: {reason}")]
    RecordShapeError { index: usize, reason: String },

    #[error("Failed to download {url}: {reason}")]
    ImageDownloadFailure { url: String, reason: String },

    #[error("Failed to decode or encode image: {0}")]
    DecodeFailure(#[from] image::ImageError),

    /// Object store rejected or failed a write
    #[error("Failed to write s3 object {key}: {reason}")]
    StorageWriteFailure { key: String, reason: String },

    /// Raised instead of skipping a step when the failure policy is fail-fast
    #[error("Record {index} failed: {source}")]
    RecordFailed {
        index: usize,
        #[source]
        source: Box<PipelineError>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl PipelineError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::FetchFailure {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn download(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::ImageDownloadFailure {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn storage(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::StorageWriteFailure {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether an image or thumbnail step that hit this error may be skipped
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            PipelineError::ImageDownloadFailure { .. }
                | PipelineError::DecodeFailure(_)
                | PipelineError::StorageWriteFailure { .. }
        )
    }
}
