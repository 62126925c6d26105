//! Capability seams for external media tools.
//!
//! One method each; the pipeline only depends on these traits. Tests
//! substitute deterministic fakes that write synthetic output files.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use vodworks_core::models::ResolutionProfile;
use vodworks_core::PipelineError;

/// Container-level metadata for a source file.
#[derive(Debug, Clone, Copy)]
pub struct MediaInfo {
    pub duration_seconds: f64,
    pub file_size_bytes: u64,
}

/// Produces one resolution's HLS rendition (playlist plus numbered
/// segments) into `output_dir` and returns the playlist path.
#[async_trait]
pub trait HlsEncoder: Send + Sync {
    async fn encode(
        &self,
        input: &Path,
        profile: &ResolutionProfile,
        output_dir: &Path,
    ) -> Result<PathBuf, PipelineError>;
}

/// Extracts duration from the input container and size from the
/// filesystem entry (not the encoded outputs).
#[async_trait]
pub trait MediaProber: Send + Sync {
    async fn probe(&self, input: &Path) -> Result<MediaInfo, PipelineError>;
}

/// Extracts a single frame at a fixed offset and returns the thumbnail
/// path relative to the media root.
#[async_trait]
pub trait ThumbnailGenerator: Send + Sync {
    async fn generate(&self, input: &Path, video_id: Uuid) -> Result<String, PipelineError>;
}
