//! Filesystem layout under the media root.
//!
//! Encoded output lives at `hls/<video_id>/<resolution>/index.m3u8`
//! with segments `segment_NNNNN.ts` (5-digit zero-padded); thumbnails
//! at `thumbnails/<video_id>_thumb.jpg`. All backends and consumers
//! must use this layout for consistency.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use uuid::Uuid;

use crate::models::Resolution;

/// Playlist file name inside a resolution directory.
pub const MANIFEST_FILE_NAME: &str = "index.m3u8";

/// ffmpeg segment filename template (printf-style, 5-digit sequence).
pub const SEGMENT_FILE_TEMPLATE: &str = "segment_%05d.ts";

static SEGMENT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^segment_\d{5}\.ts$").expect("valid segment name regex"));

/// Segment file name for a sequence number, e.g. `segment_00042.ts`.
pub fn segment_file_name(sequence: u32) -> String {
    format!("segment_{:05}.ts", sequence)
}

/// Produced-format contract for segment names. Consumers must reject
/// any externally supplied name that does not match.
pub fn is_valid_segment_name(name: &str) -> bool {
    SEGMENT_NAME_RE.is_match(name)
}

/// Resolves paths under the media root.
#[derive(Debug, Clone)]
pub struct MediaPaths {
    root: PathBuf,
}

impl MediaPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a source path against the root unless already absolute.
    pub fn resolve_source(&self, source: &str) -> PathBuf {
        let path = Path::new(source);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// HLS output directory for one video: `<root>/hls/<video_id>`.
    pub fn hls_dir(&self, video_id: Uuid) -> PathBuf {
        self.root.join("hls").join(video_id.to_string())
    }

    /// Output directory for one resolution of one video.
    pub fn resolution_dir(&self, video_id: Uuid, resolution: Resolution) -> PathBuf {
        self.hls_dir(video_id).join(resolution.as_str())
    }

    pub fn thumbnail_dir(&self) -> PathBuf {
        self.root.join("thumbnails")
    }

    /// Deterministic thumbnail file name so repeated runs overwrite.
    pub fn thumbnail_file_name(video_id: Uuid) -> String {
        format!("{}_thumb.jpg", video_id)
    }

    pub fn thumbnail_path(&self, video_id: Uuid) -> PathBuf {
        self.thumbnail_dir().join(Self::thumbnail_file_name(video_id))
    }

    /// Thumbnail path as stored on the record, relative to the root.
    pub fn thumbnail_relative(video_id: Uuid) -> String {
        format!("thumbnails/{}", Self::thumbnail_file_name(video_id))
    }

    /// Render a produced path relative to the root for storage; paths
    /// outside the root are kept as-is.
    pub fn relative_to_root(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_names_are_five_digit_zero_padded() {
        assert_eq!(segment_file_name(0), "segment_00000.ts");
        assert_eq!(segment_file_name(42), "segment_00042.ts");
        assert!(is_valid_segment_name("segment_00000.ts"));
        assert!(is_valid_segment_name("segment_99999.ts"));
    }

    #[test]
    fn malformed_segment_names_are_rejected() {
        assert!(!is_valid_segment_name("segment_1.ts"));
        assert!(!is_valid_segment_name("segment_000001.ts"));
        assert!(!is_valid_segment_name("segment_0000a.ts"));
        assert!(!is_valid_segment_name("clip.ts"));
        assert!(!is_valid_segment_name("segment_00001.ts.bak"));
    }

    #[test]
    fn layout_matches_contract() {
        let id: Uuid = Uuid::new_v4();
        let paths = MediaPaths::new("/media");
        assert_eq!(
            paths.resolution_dir(id, Resolution::R720p),
            PathBuf::from(format!("/media/hls/{}/720p", id))
        );
        assert_eq!(
            MediaPaths::thumbnail_relative(id),
            format!("thumbnails/{}_thumb.jpg", id)
        );
    }

    #[test]
    fn manifest_paths_are_stored_relative_unless_absolute() {
        let id = Uuid::new_v4();
        let paths = MediaPaths::new("/media");
        let manifest = paths
            .resolution_dir(id, Resolution::R360p)
            .join(MANIFEST_FILE_NAME);
        assert_eq!(
            paths.relative_to_root(&manifest),
            format!("hls/{}/360p/index.m3u8", id)
        );
        let external = Path::new("/srv/elsewhere/index.m3u8");
        assert_eq!(paths.relative_to_root(external), "/srv/elsewhere/index.m3u8");
    }

    #[test]
    fn relative_sources_resolve_against_root() {
        let paths = MediaPaths::new("/media");
        assert_eq!(
            paths.resolve_source("uploads/clip.mp4"),
            PathBuf::from("/media/uploads/clip.mp4")
        );
        assert_eq!(
            paths.resolve_source("/tmp/clip.mp4"),
            PathBuf::from("/tmp/clip.mp4")
        );
    }
}
