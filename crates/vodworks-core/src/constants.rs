//! Shared constants for the processing pipeline.

/// Progress ceiling reached once every resolution in the ladder has been
/// encoded. The remaining 20 points are reserved for metadata and
/// thumbnail work so consumers always see a monotonic 0-100 scale.
pub const LADDER_PROGRESS_CEILING: i32 = 80;

/// Progress persisted before metadata extraction starts.
pub const PROGRESS_METADATA: i32 = 85;

/// Progress persisted before thumbnail generation starts.
pub const PROGRESS_THUMBNAIL: i32 = 95;

/// Progress on successful completion.
pub const PROGRESS_COMPLETE: i32 = 100;

/// Fixed HLS target segment duration in seconds (complete VOD playlist,
/// unbounded list size).
pub const DEFAULT_HLS_SEGMENT_DURATION: u64 = 10;

/// Offset into the source at which the thumbnail frame is extracted.
pub const THUMBNAIL_OFFSET_SECONDS: u64 = 3;
