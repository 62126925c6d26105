//! Pipeline orchestrator: the per-job state machine.
//!
//! Drives one video through setup, the resolution ladder and
//! finalization, owning every status/progress/error transition on the
//! record. Fatal stage failures are written to the record before the
//! error is returned so the failure stays observable even after the
//! retry budget is exhausted; thumbnail failures are logged and
//! swallowed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use uuid::Uuid;

use vodworks_core::constants::{PROGRESS_METADATA, PROGRESS_THUMBNAIL};
use vodworks_core::models::{ResolutionProfile, Video};
use vodworks_core::paths::MediaPaths;
use vodworks_core::{JobError, PipelineError};
use vodworks_store::{VariantRepository, VideoRepository};

use crate::ladder::LadderProcessor;
use crate::traits::{HlsEncoder, MediaProber, ThumbnailGenerator};

pub struct VideoPipeline {
    videos: Arc<dyn VideoRepository>,
    prober: Arc<dyn MediaProber>,
    thumbnailer: Arc<dyn ThumbnailGenerator>,
    ladder: LadderProcessor,
    paths: MediaPaths,
}

impl VideoPipeline {
    pub fn new(
        videos: Arc<dyn VideoRepository>,
        variants: Arc<dyn VariantRepository>,
        encoder: Arc<dyn HlsEncoder>,
        prober: Arc<dyn MediaProber>,
        thumbnailer: Arc<dyn ThumbnailGenerator>,
        profiles: Vec<ResolutionProfile>,
        paths: MediaPaths,
    ) -> Self {
        let ladder = LadderProcessor::new(
            encoder,
            videos.clone(),
            variants,
            profiles,
            paths.clone(),
        );
        Self {
            videos,
            prober,
            thumbnailer,
            ladder,
            paths,
        }
    }

    /// Run one job attempt to a terminal state.
    ///
    /// Any fatal failure is recorded on the video (`failed` status plus
    /// a human-readable cause) and then returned so the queue's retry
    /// policy can act on it. `VideoNotFound` has no record to write to
    /// and maps to an unrecoverable error.
    #[tracing::instrument(skip(self))]
    pub async fn process(&self, video_id: Uuid) -> Result<(), JobError> {
        tracing::info!(video_id = %video_id, "Starting HLS processing");

        match self.run(video_id).await {
            Ok(()) => {
                tracing::info!(video_id = %video_id, "Video processing completed successfully");
                Ok(())
            }
            Err(err) => {
                if !matches!(err, PipelineError::VideoNotFound(_)) {
                    if let Err(store_err) =
                        self.videos.mark_failed(video_id, &err.to_string()).await
                    {
                        tracing::error!(
                            video_id = %video_id,
                            error = %store_err,
                            "Failed to record processing failure"
                        );
                    }
                }
                tracing::error!(video_id = %video_id, error = %err, "Video processing failed");
                Err(JobError::from(err))
            }
        }
    }

    async fn run(&self, video_id: Uuid) -> Result<(), PipelineError> {
        let video = self
            .videos
            .get(video_id)
            .await?
            .ok_or(PipelineError::VideoNotFound(video_id))?;

        let (input_path, output_dir) = self.setup(&video).await?;
        self.ladder.process(&video, &input_path, &output_dir).await?;
        self.finalize(&video, &input_path).await?;
        Ok(())
    }

    /// Enter the `processing` state and prepare filesystem locations.
    async fn setup(&self, video: &Video) -> Result<(PathBuf, PathBuf), PipelineError> {
        self.videos.mark_processing(video.id).await?;

        let source = video
            .video_file
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(PipelineError::MissingSource(video.id))?;

        let input_path = self.paths.resolve_source(source);
        let output_dir = self.paths.hls_dir(video.id);
        tokio::fs::create_dir_all(&output_dir).await?;

        tracing::debug!(
            video_id = %video.id,
            input = %input_path.display(),
            output_dir = %output_dir.display(),
            "Video processing setup completed"
        );
        Ok((input_path, output_dir))
    }

    /// Metadata at 85, thumbnail at 95, then the terminal `completed`
    /// state at 100. Thumbnail trouble never fails the job.
    async fn finalize(&self, video: &Video, input: &Path) -> Result<(), PipelineError> {
        self.videos.set_progress(video.id, PROGRESS_METADATA).await?;

        let info = self.prober.probe(input).await?;
        let duration_seconds = info.duration_seconds as i64;
        let file_size_mb = (info.file_size_bytes / (1024 * 1024)) as i64;
        self.videos
            .set_metadata(video.id, duration_seconds, file_size_mb)
            .await?;
        tracing::info!(
            video_id = %video.id,
            duration_seconds,
            file_size_mb,
            "Metadata extracted"
        );

        self.videos
            .set_progress(video.id, PROGRESS_THUMBNAIL)
            .await?;
        match self.thumbnailer.generate(input, video.id).await {
            Ok(thumbnail_path) => {
                // The follow-up write is soft too: a missing thumbnail
                // URL must not fail an otherwise finished job.
                if let Err(err) = self.videos.set_thumbnail(video.id, &thumbnail_path).await {
                    tracing::error!(
                        video_id = %video.id,
                        error = %err,
                        "Failed to store thumbnail path, continuing"
                    );
                } else {
                    tracing::info!(
                        video_id = %video.id,
                        thumbnail = %thumbnail_path,
                        "Thumbnail generated"
                    );
                }
            }
            Err(err) => {
                tracing::error!(
                    video_id = %video.id,
                    error = %err,
                    "Thumbnail generation failed, continuing without thumbnail"
                );
            }
        }

        self.videos.mark_completed(video.id).await?;
        Ok(())
    }
}
