//! Postgres video repository.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use vodworks_core::models::{ProcessingStatus, Video};

use crate::traits::VideoRepository;

const VIDEO_COLUMNS: &str = "id, title, description, category, video_file, \
     processing_status, processing_progress, processing_error, \
     duration_seconds, file_size_mb, thumbnail_url, created_at, updated_at";

#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Video>> {
        let video = sqlx::query_as::<Postgres, Video>(&format!(
            "SELECT {} FROM videos WHERE id = $1",
            VIDEO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch video")?;
        Ok(video)
    }

    async fn mark_processing(&self, id: Uuid) -> Result<()> {
        sqlx::query(
            "UPDATE videos SET processing_status = $2, processing_progress = 0, \
             processing_error = NULL, updated_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(ProcessingStatus::Processing)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .context("Failed to mark video as processing")?;
        Ok(())
    }

    async fn set_progress(&self, id: Uuid, progress: i32) -> Result<()> {
        sqlx::query("UPDATE videos SET processing_progress = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(progress)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .context("Failed to update video progress")?;
        Ok(())
    }

    async fn set_metadata(
        &self,
        id: Uuid,
        duration_seconds: i64,
        file_size_mb: i64,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE videos SET duration_seconds = $2, file_size_mb = $3, updated_at = $4 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(duration_seconds)
        .bind(file_size_mb)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .context("Failed to update video metadata")?;
        Ok(())
    }

    async fn set_thumbnail(&self, id: Uuid, thumbnail_url: &str) -> Result<()> {
        sqlx::query("UPDATE videos SET thumbnail_url = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(thumbnail_url)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .context("Failed to update video thumbnail")?;
        Ok(())
    }

    async fn mark_completed(&self, id: Uuid) -> Result<()> {
        sqlx::query(
            "UPDATE videos SET processing_status = $2, processing_progress = 100, \
             updated_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(ProcessingStatus::Completed)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .context("Failed to mark video as completed")?;
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<()> {
        sqlx::query(
            "UPDATE videos SET processing_status = $2, processing_error = $3, \
             updated_at = $4 WHERE id = $1",
        )
        .bind(id)
        .bind(ProcessingStatus::Failed)
        .bind(error)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .context("Failed to mark video as failed")?;
        Ok(())
    }
}
