//! In-memory repositories and deterministic tool fakes for pipeline
//! tests. No database and no external binaries.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use uuid::Uuid;

use vodworks_core::models::{
    default_ladder, ProcessingStatus, Resolution, ResolutionProfile, StreamVariant, Video,
};
use vodworks_core::paths::{segment_file_name, MediaPaths, MANIFEST_FILE_NAME};
use vodworks_core::PipelineError;
use vodworks_media::{HlsEncoder, MediaInfo, MediaProber, ThumbnailGenerator, VideoPipeline};
use vodworks_store::{VariantRepository, VideoRepository};

#[derive(Default)]
pub struct MockVideoRepository {
    videos: Mutex<HashMap<Uuid, Video>>,
    /// Every progress value persisted, in order, across all writes.
    pub progress_log: Mutex<Vec<i32>>,
}

impl MockVideoRepository {
    pub fn insert(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn snapshot(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }

    pub fn progress_values(&self) -> Vec<i32> {
        self.progress_log.lock().unwrap().clone()
    }

    fn update(&self, id: Uuid, f: impl FnOnce(&mut Video)) {
        if let Some(video) = self.videos.lock().unwrap().get_mut(&id) {
            f(video);
            video.updated_at = Utc::now();
        }
    }
}

#[async_trait]
impl VideoRepository for MockVideoRepository {
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Video>> {
        Ok(self.videos.lock().unwrap().get(&id).cloned())
    }

    async fn mark_processing(&self, id: Uuid) -> anyhow::Result<()> {
        self.update(id, |v| {
            v.processing_status = ProcessingStatus::Processing;
            v.processing_progress = 0;
            v.processing_error = None;
        });
        self.progress_log.lock().unwrap().push(0);
        Ok(())
    }

    async fn set_progress(&self, id: Uuid, progress: i32) -> anyhow::Result<()> {
        self.update(id, |v| v.processing_progress = progress);
        self.progress_log.lock().unwrap().push(progress);
        Ok(())
    }

    async fn set_metadata(
        &self,
        id: Uuid,
        duration_seconds: i64,
        file_size_mb: i64,
    ) -> anyhow::Result<()> {
        self.update(id, |v| {
            v.duration_seconds = Some(duration_seconds);
            v.file_size_mb = Some(file_size_mb);
        });
        Ok(())
    }

    async fn set_thumbnail(&self, id: Uuid, thumbnail_url: &str) -> anyhow::Result<()> {
        let url = thumbnail_url.to_string();
        self.update(id, |v| v.thumbnail_url = Some(url));
        Ok(())
    }

    async fn mark_completed(&self, id: Uuid) -> anyhow::Result<()> {
        self.update(id, |v| {
            v.processing_status = ProcessingStatus::Completed;
            v.processing_progress = 100;
        });
        self.progress_log.lock().unwrap().push(100);
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> anyhow::Result<()> {
        let error = error.to_string();
        self.update(id, |v| {
            v.processing_status = ProcessingStatus::Failed;
            v.processing_error = Some(error);
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct MockVariantRepository {
    variants: Mutex<HashMap<(Uuid, Resolution), StreamVariant>>,
    pub upsert_count: Mutex<usize>,
}

impl MockVariantRepository {
    pub fn for_video(&self, video_id: Uuid) -> Vec<StreamVariant> {
        let mut out: Vec<StreamVariant> = self
            .variants
            .lock()
            .unwrap()
            .values()
            .filter(|v| v.video_id == video_id)
            .cloned()
            .collect();
        out.sort_by_key(|v| v.resolution.as_str());
        out
    }

    pub fn upserts(&self) -> usize {
        *self.upsert_count.lock().unwrap()
    }
}

#[async_trait]
impl VariantRepository for MockVariantRepository {
    async fn upsert(
        &self,
        video_id: Uuid,
        resolution: Resolution,
        manifest_path: &str,
    ) -> anyhow::Result<StreamVariant> {
        *self.upsert_count.lock().unwrap() += 1;
        let mut variants = self.variants.lock().unwrap();
        let now = Utc::now();
        let variant = variants
            .entry((video_id, resolution))
            .and_modify(|v| {
                v.manifest_path = manifest_path.to_string();
                v.updated_at = now;
            })
            .or_insert_with(|| StreamVariant {
                id: Uuid::new_v4(),
                video_id,
                resolution,
                manifest_path: manifest_path.to_string(),
                created_at: now,
                updated_at: now,
            });
        Ok(variant.clone())
    }

    async fn list_for_video(&self, video_id: Uuid) -> anyhow::Result<Vec<StreamVariant>> {
        Ok(self.for_video(video_id))
    }
}

/// Writes a synthetic playlist plus two segments per rung; optionally
/// fails on one resolution.
pub struct FakeEncoder {
    pub fail_on: Option<Resolution>,
}

#[async_trait]
impl HlsEncoder for FakeEncoder {
    async fn encode(
        &self,
        _input: &Path,
        profile: &ResolutionProfile,
        output_dir: &Path,
    ) -> Result<PathBuf, PipelineError> {
        if self.fail_on == Some(profile.resolution) {
            return Err(PipelineError::Encode {
                resolution: profile.resolution.to_string(),
                detail: "synthetic encoder failure".to_string(),
            });
        }
        let playlist = output_dir.join(MANIFEST_FILE_NAME);
        let mut body = String::from("#EXTM3U\n#EXT-X-PLAYLIST-TYPE:VOD\n");
        for seq in 0..2u32 {
            let name = segment_file_name(seq);
            tokio::fs::write(output_dir.join(&name), b"segment").await?;
            body.push_str(&format!("#EXTINF:10.0,\n{}\n", name));
        }
        body.push_str("#EXT-X-ENDLIST\n");
        tokio::fs::write(&playlist, body).await?;
        Ok(playlist)
    }
}

pub struct FakeProber {
    pub fail: bool,
    pub duration_seconds: f64,
    pub file_size_bytes: u64,
}

#[async_trait]
impl MediaProber for FakeProber {
    async fn probe(&self, _input: &Path) -> Result<MediaInfo, PipelineError> {
        if self.fail {
            return Err(PipelineError::Probe("synthetic probe failure".to_string()));
        }
        Ok(MediaInfo {
            duration_seconds: self.duration_seconds,
            file_size_bytes: self.file_size_bytes,
        })
    }
}

pub struct FakeThumbnailer {
    pub fail: bool,
    pub media_root: PathBuf,
}

#[async_trait]
impl ThumbnailGenerator for FakeThumbnailer {
    async fn generate(&self, _input: &Path, video_id: Uuid) -> Result<String, PipelineError> {
        if self.fail {
            return Err(PipelineError::Thumbnail(
                "synthetic thumbnail failure".to_string(),
            ));
        }
        let dir = self.media_root.join("thumbnails");
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| PipelineError::Thumbnail(e.to_string()))?;
        tokio::fs::write(dir.join(MediaPaths::thumbnail_file_name(video_id)), b"jpeg")
            .await
            .map_err(|e| PipelineError::Thumbnail(e.to_string()))?;
        Ok(MediaPaths::thumbnail_relative(video_id))
    }
}

pub struct Harness {
    pub media_root: TempDir,
    pub videos: Arc<MockVideoRepository>,
    pub variants: Arc<MockVariantRepository>,
    pub pipeline: VideoPipeline,
}

pub struct HarnessOptions {
    pub encoder_fail_on: Option<Resolution>,
    pub probe_fails: bool,
    pub thumbnail_fails: bool,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            encoder_fail_on: None,
            probe_fails: false,
            thumbnail_fails: false,
        }
    }
}

pub fn harness(options: HarnessOptions) -> Harness {
    let media_root = TempDir::new().expect("temp media root");
    let root_path = media_root.path().to_path_buf();
    let paths = MediaPaths::new(&root_path);

    let videos = Arc::new(MockVideoRepository::default());
    let variants = Arc::new(MockVariantRepository::default());

    let pipeline = VideoPipeline::new(
        videos.clone(),
        variants.clone(),
        Arc::new(FakeEncoder {
            fail_on: options.encoder_fail_on,
        }),
        Arc::new(FakeProber {
            fail: options.probe_fails,
            duration_seconds: 123.9,
            file_size_bytes: 12 * 1024 * 1024 + 7,
        }),
        Arc::new(FakeThumbnailer {
            fail: options.thumbnail_fails,
            media_root: root_path,
        }),
        default_ladder(),
        paths,
    );

    Harness {
        media_root,
        videos,
        variants,
        pipeline,
    }
}

/// Insert a pending video record, optionally writing a source file
/// under the media root.
pub fn seed_video(h: &Harness, with_source: bool) -> Uuid {
    let id = Uuid::new_v4();
    let video_file = if with_source {
        let uploads = h.media_root.path().join("uploads");
        std::fs::create_dir_all(&uploads).expect("uploads dir");
        std::fs::write(uploads.join("clip.mp4"), b"not really mp4").expect("source file");
        Some("uploads/clip.mp4".to_string())
    } else {
        None
    };

    h.videos.insert(Video {
        id,
        title: "Big Buck Bunny".to_string(),
        description: "test clip".to_string(),
        category: "animation".to_string(),
        video_file,
        processing_status: ProcessingStatus::Pending,
        processing_progress: 0,
        processing_error: None,
        duration_seconds: None,
        file_size_mb: None,
        thumbnail_url: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    });
    id
}
