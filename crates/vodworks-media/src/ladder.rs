//! Resolution ladder processor.
//!
//! Walks the fixed ordered profile list, encodes one rendition per
//! rung, upserts the variant record and persists progress immediately
//! so external observers see monotonic progress during long runs.
//! Fails fast on the first unrecoverable per-resolution failure.

use std::path::Path;
use std::sync::Arc;

use vodworks_core::models::{ladder_progress, ResolutionProfile, Video};
use vodworks_core::paths::MediaPaths;
use vodworks_core::PipelineError;
use vodworks_store::{VariantRepository, VideoRepository};

use crate::traits::HlsEncoder;

pub struct LadderProcessor {
    encoder: Arc<dyn HlsEncoder>,
    videos: Arc<dyn VideoRepository>,
    variants: Arc<dyn VariantRepository>,
    profiles: Vec<ResolutionProfile>,
    paths: MediaPaths,
}

impl LadderProcessor {
    pub fn new(
        encoder: Arc<dyn HlsEncoder>,
        videos: Arc<dyn VideoRepository>,
        variants: Arc<dyn VariantRepository>,
        profiles: Vec<ResolutionProfile>,
        paths: MediaPaths,
    ) -> Self {
        Self {
            encoder,
            videos,
            variants,
            profiles,
            paths,
        }
    }

    pub fn profiles(&self) -> &[ResolutionProfile] {
        &self.profiles
    }

    /// Encode every rung in order. On encoder failure the error
    /// propagates immediately: no variant is left for the failed
    /// resolution and later resolutions are not attempted.
    pub async fn process(
        &self,
        video: &Video,
        input: &Path,
        output_dir: &Path,
    ) -> Result<(), PipelineError> {
        let total = self.profiles.len();
        tracing::info!(
            video_id = %video.id,
            resolutions = total,
            "Processing resolution ladder"
        );

        for (index, profile) in self.profiles.iter().enumerate() {
            let resolution_dir = output_dir.join(profile.resolution.as_str());
            tokio::fs::create_dir_all(&resolution_dir).await?;

            let manifest = self.encoder.encode(input, profile, &resolution_dir).await?;
            let manifest_path = self.paths.relative_to_root(&manifest);

            self.variants
                .upsert(video.id, profile.resolution, &manifest_path)
                .await?;

            let progress = ladder_progress(index, total);
            self.videos.set_progress(video.id, progress).await?;

            tracing::debug!(
                video_id = %video.id,
                resolution = %profile.resolution,
                progress,
                "Resolution encoded"
            );
        }

        tracing::debug!(video_id = %video.id, "All resolutions processed");
        Ok(())
    }
}
