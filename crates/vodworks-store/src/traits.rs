//! Repository traits consumed by the pipeline.
//!
//! The orchestrator and ladder processor only ever see these traits;
//! tests substitute in-memory implementations.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use vodworks_core::models::{Resolution, StreamVariant, Video};

/// Key-value-by-id access to video records with atomic field updates.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Video>>;

    /// Enter the `processing` state: progress 0, previous error cleared.
    async fn mark_processing(&self, id: Uuid) -> Result<()>;

    async fn set_progress(&self, id: Uuid, progress: i32) -> Result<()>;

    async fn set_metadata(&self, id: Uuid, duration_seconds: i64, file_size_mb: i64)
        -> Result<()>;

    async fn set_thumbnail(&self, id: Uuid, thumbnail_url: &str) -> Result<()>;

    /// Terminal success state: `completed`, progress 100.
    async fn mark_completed(&self, id: Uuid) -> Result<()>;

    /// Terminal failure state: `failed`, with a human-readable cause.
    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<()>;
}

/// Variant records, upserted per `(video_id, resolution)` pair.
#[async_trait]
pub trait VariantRepository: Send + Sync {
    async fn upsert(
        &self,
        video_id: Uuid,
        resolution: Resolution,
        manifest_path: &str,
    ) -> Result<StreamVariant>;

    async fn list_for_video(&self, video_id: Uuid) -> Result<Vec<StreamVariant>>;
}
