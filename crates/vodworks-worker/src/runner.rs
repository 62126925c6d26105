//! Job dispatch seam between the queue and the pipeline.

use async_trait::async_trait;
use uuid::Uuid;

use vodworks_core::JobError;
use vodworks_media::VideoPipeline;

/// Executes one job attempt for a video id.
///
/// The queue holds a weak reference and calls `process_video` per
/// attempt; recoverability of the returned error decides whether the
/// retry budget is spent.
#[async_trait]
pub trait JobRunner: Send + Sync {
    async fn process_video(&self, video_id: Uuid) -> Result<(), JobError>;
}

#[async_trait]
impl JobRunner for VideoPipeline {
    async fn process_video(&self, video_id: Uuid) -> Result<(), JobError> {
        self.process(video_id).await
    }
}
