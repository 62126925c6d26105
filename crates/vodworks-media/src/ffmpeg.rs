//! ffmpeg/ffprobe-backed implementations of the tool seams.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use uuid::Uuid;

use vodworks_core::constants::THUMBNAIL_OFFSET_SECONDS;
use vodworks_core::models::ResolutionProfile;
use vodworks_core::paths::{MediaPaths, MANIFEST_FILE_NAME, SEGMENT_FILE_TEMPLATE};
use vodworks_core::PipelineError;

use crate::traits::{HlsEncoder, MediaInfo, MediaProber, ThumbnailGenerator};

/// Reject tool paths containing shell metacharacters or traversal.
fn validate_tool_path(path: &str) -> Result<()> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(anyhow!("Tool path contains dangerous characters: {}", path));
    }
    if path.contains("..") {
        return Err(anyhow!("Tool path contains directory traversal: {}", path));
    }
    Ok(())
}

/// Argument list for one HLS rendition: H.264 video at the profile
/// bitrate, AAC audio at 128k, vertical scale to the profile height
/// with an even computed width, fixed segment duration and an
/// unbounded VOD segment list.
fn hls_encode_args(
    input: &Path,
    profile: &ResolutionProfile,
    segment_duration: u64,
    segment_pattern: &Path,
    playlist: &Path,
) -> Vec<String> {
    vec![
        "-i".to_string(),
        input.to_string_lossy().into_owned(),
        "-vf".to_string(),
        format!("scale=-2:{}", profile.height),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-b:v".to_string(),
        format!("{}k", profile.bitrate_kbps),
        "-c:a".to_string(),
        "aac".to_string(),
        "-b:a".to_string(),
        "128k".to_string(),
        "-hls_time".to_string(),
        segment_duration.to_string(),
        "-hls_list_size".to_string(),
        "0".to_string(),
        "-hls_segment_filename".to_string(),
        segment_pattern.to_string_lossy().into_owned(),
        "-f".to_string(),
        "hls".to_string(),
        playlist.to_string_lossy().into_owned(),
    ]
}

fn thumbnail_args(input: &Path, offset_seconds: u64, output: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-i".to_string(),
        input.to_string_lossy().into_owned(),
        "-ss".to_string(),
        format!("00:00:{:02}", offset_seconds),
        "-vframes".to_string(),
        "1".to_string(),
        "-q:v".to_string(),
        "2".to_string(),
        output.to_string_lossy().into_owned(),
    ]
}

fn parse_duration(raw: &str) -> Result<f64, PipelineError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| PipelineError::Probe(format!("unparsable duration: {:?}", trimmed)))
}

pub struct FfmpegEncoder {
    ffmpeg_path: String,
    segment_duration: u64,
}

impl FfmpegEncoder {
    pub fn new(ffmpeg_path: String, segment_duration: u64) -> Result<Self> {
        validate_tool_path(&ffmpeg_path).context("Invalid ffmpeg_path")?;
        Ok(Self {
            ffmpeg_path,
            segment_duration,
        })
    }
}

#[async_trait]
impl HlsEncoder for FfmpegEncoder {
    #[tracing::instrument(skip(self, input, output_dir), fields(resolution = %profile.resolution))]
    async fn encode(
        &self,
        input: &Path,
        profile: &ResolutionProfile,
        output_dir: &Path,
    ) -> Result<PathBuf, PipelineError> {
        let playlist = output_dir.join(MANIFEST_FILE_NAME);
        let segment_pattern = output_dir.join(SEGMENT_FILE_TEMPLATE);
        let args = hls_encode_args(
            input,
            profile,
            self.segment_duration,
            &segment_pattern,
            &playlist,
        );

        let output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| PipelineError::Encode {
                resolution: profile.resolution.to_string(),
                detail: format!("failed to execute ffmpeg: {}", e),
            })?;

        if !output.status.success() {
            return Err(PipelineError::Encode {
                resolution: profile.resolution.to_string(),
                detail: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        tracing::debug!(playlist = %playlist.display(), "ffmpeg HLS conversion finished");
        Ok(playlist)
    }
}

pub struct FfprobeProber {
    ffprobe_path: String,
}

impl FfprobeProber {
    pub fn new(ffprobe_path: String) -> Result<Self> {
        validate_tool_path(&ffprobe_path).context("Invalid ffprobe_path")?;
        Ok(Self { ffprobe_path })
    }
}

#[async_trait]
impl MediaProber for FfprobeProber {
    async fn probe(&self, input: &Path) -> Result<MediaInfo, PipelineError> {
        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "quiet", "-show_entries", "format=duration", "-of", "csv=p=0"])
            .arg(input)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| PipelineError::Probe(format!("failed to execute ffprobe: {}", e)))?;

        if !output.status.success() {
            return Err(PipelineError::Probe(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        let duration_seconds = parse_duration(&String::from_utf8_lossy(&output.stdout))?;
        let meta = tokio::fs::metadata(input).await.map_err(|e| {
            PipelineError::Probe(format!("failed to stat {}: {}", input.display(), e))
        })?;

        Ok(MediaInfo {
            duration_seconds,
            file_size_bytes: meta.len(),
        })
    }
}

pub struct FfmpegThumbnailer {
    ffmpeg_path: String,
    paths: MediaPaths,
}

impl FfmpegThumbnailer {
    pub fn new(ffmpeg_path: String, paths: MediaPaths) -> Result<Self> {
        validate_tool_path(&ffmpeg_path).context("Invalid ffmpeg_path")?;
        Ok(Self { ffmpeg_path, paths })
    }
}

#[async_trait]
impl ThumbnailGenerator for FfmpegThumbnailer {
    async fn generate(&self, input: &Path, video_id: Uuid) -> Result<String, PipelineError> {
        let dir = self.paths.thumbnail_dir();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| PipelineError::Thumbnail(e.to_string()))?;

        let thumbnail_path = self.paths.thumbnail_path(video_id);
        let args = thumbnail_args(input, THUMBNAIL_OFFSET_SECONDS, &thumbnail_path);

        let output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| PipelineError::Thumbnail(format!("failed to execute ffmpeg: {}", e)))?;

        if !output.status.success() {
            return Err(PipelineError::Thumbnail(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        Ok(MediaPaths::thumbnail_relative(video_id))
    }
}
