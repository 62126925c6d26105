//! Error types for the transcoding pipeline.
//!
//! Each stage of the pipeline fails with a dedicated variant so the
//! orchestrator can decide propagation per stage instead of relying on a
//! blanket catch: encode and probe failures are fatal to the job,
//! thumbnail failures are swallowed by the caller, and lookup failures
//! are fatal and not worth retrying.

use std::io;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The video record does not exist at job start. Retrying cannot
    /// change the outcome.
    #[error("video {0} not found")]
    VideoNotFound(Uuid),

    /// The record exists but carries no source file to process.
    #[error("video {0} has no source file attached")]
    MissingSource(Uuid),

    /// External encoder returned a non-success status for one
    /// resolution. Carries the tool's diagnostic output.
    #[error("encoding {resolution} failed: {detail}")]
    Encode { resolution: String, detail: String },

    /// Media inspection failed or produced unparsable output.
    #[error("probe failed: {0}")]
    Probe(String),

    /// Frame extraction failed. Non-fatal: the caller logs and moves on.
    #[error("thumbnail generation failed: {0}")]
    Thumbnail(String),

    /// Record store read or write failed.
    #[error("store error: {0}")]
    Store(anyhow::Error),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl PipelineError {
    /// Whether a retried job attempt could plausibly succeed.
    ///
    /// Missing records and missing source files will not change between
    /// attempts; everything else (encoder pressure, transient store or
    /// filesystem trouble) is worth the queue's retry budget.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            PipelineError::VideoNotFound(_) | PipelineError::MissingSource(_)
        )
    }
}

impl From<anyhow::Error> for PipelineError {
    fn from(err: anyhow::Error) -> Self {
        PipelineError::Store(err)
    }
}
