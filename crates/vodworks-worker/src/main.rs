//! Transcoding worker: pulls processing jobs and drives the pipeline.

use anyhow::Result;
use std::sync::Arc;

use vodworks_core::models::default_ladder;
use vodworks_core::paths::MediaPaths;
use vodworks_core::Config;
use vodworks_media::{FfmpegEncoder, FfmpegThumbnailer, FfprobeProber, VideoPipeline};
use vodworks_store::{
    PgVariantRepository, PgVideoRepository, VariantRepository, VideoRepository,
};
use vodworks_worker::queue::{JobPolicy, JobQueue, JobQueueConfig};
use vodworks_worker::runner::JobRunner;
use vodworks_worker::{setup, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_telemetry();

    let config = Config::from_env()?;
    let pool = setup::setup_database(&config).await?;

    let videos: Arc<dyn VideoRepository> = Arc::new(PgVideoRepository::new(pool.clone()));
    let variants: Arc<dyn VariantRepository> = Arc::new(PgVariantRepository::new(pool));
    let paths = MediaPaths::new(&config.media_root);

    let encoder = FfmpegEncoder::new(config.ffmpeg_path.clone(), config.hls_segment_duration)?;
    let prober = FfprobeProber::new(config.ffprobe_path.clone())?;
    let thumbnailer = FfmpegThumbnailer::new(config.ffmpeg_path.clone(), paths.clone())?;

    let pipeline: Arc<dyn JobRunner> = Arc::new(VideoPipeline::new(
        videos,
        variants,
        Arc::new(encoder),
        Arc::new(prober),
        Arc::new(thumbnailer),
        default_ladder(),
        paths,
    ));

    let queue = JobQueue::new(
        Arc::downgrade(&pipeline),
        JobQueueConfig {
            max_workers: config.worker_max_workers,
            queue_capacity: 256,
            policy: JobPolicy::from_config(&config),
        },
    );

    tracing::info!(
        media_root = %config.media_root,
        max_workers = config.worker_max_workers,
        "Vodworks worker started"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    queue.shutdown().await;
    Ok(())
}
