//! Postgres stream variant repository.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use vodworks_core::models::{Resolution, StreamVariant};

use crate::traits::VariantRepository;

#[derive(Clone)]
pub struct PgVariantRepository {
    pool: PgPool,
}

impl PgVariantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VariantRepository for PgVariantRepository {
    /// Upsert keyed on `(video_id, resolution)`; re-runs overwrite the
    /// manifest path instead of accumulating rows.
    async fn upsert(
        &self,
        video_id: Uuid,
        resolution: Resolution,
        manifest_path: &str,
    ) -> Result<StreamVariant> {
        let now = Utc::now();
        let variant = sqlx::query_as::<Postgres, StreamVariant>(
            r#"
            INSERT INTO stream_variants (id, video_id, resolution, manifest_path, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT (video_id, resolution)
            DO UPDATE SET manifest_path = EXCLUDED.manifest_path, updated_at = EXCLUDED.updated_at
            RETURNING id, video_id, resolution, manifest_path, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(video_id)
        .bind(resolution)
        .bind(manifest_path)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .context("Failed to upsert stream variant")?;

        tracing::debug!(
            video_id = %video_id,
            resolution = %resolution,
            manifest_path = %manifest_path,
            "Stream variant upserted"
        );
        Ok(variant)
    }

    async fn list_for_video(&self, video_id: Uuid) -> Result<Vec<StreamVariant>> {
        let variants = sqlx::query_as::<Postgres, StreamVariant>(
            "SELECT id, video_id, resolution, manifest_path, created_at, updated_at \
             FROM stream_variants WHERE video_id = $1 ORDER BY resolution",
        )
        .bind(video_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list stream variants")?;
        Ok(variants)
    }
}
