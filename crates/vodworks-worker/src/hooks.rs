//! Record-creation hook.
//!
//! The persistence layer calls [`on_video_created`] after storing a new
//! video record; a processing job is enqueued iff the record carries a
//! source file. Kept free of any ORM event mechanism so any caller can
//! trigger it.

use anyhow::Result;
use uuid::Uuid;

use vodworks_core::models::Video;

use crate::queue::JobQueue;

/// Enqueue processing for a freshly created video record.
///
/// Returns the job id, or `None` when the record has no source file to
/// process. Submission failures propagate to the caller.
pub async fn on_video_created(queue: &JobQueue, video: &Video) -> Result<Option<Uuid>> {
    if !video.has_source_file() {
        tracing::debug!(video_id = %video.id, "Video created without source file, skipping enqueue");
        return Ok(None);
    }

    tracing::info!(video_id = %video.id, "New video created, enqueueing processing");
    let job_id = queue.enqueue_video(video.id).await?;
    Ok(Some(job_id))
}
