//! Transcoding pipeline: external tool invokers, the resolution ladder
//! processor and the per-job orchestrator.
//!
//! External processes are modeled as injected capabilities
//! ([`traits::HlsEncoder`], [`traits::MediaProber`],
//! [`traits::ThumbnailGenerator`]) so the orchestrator is testable
//! without real binaries; [`ffmpeg`] provides the production
//! implementations.

pub mod ffmpeg;
pub mod ladder;
pub mod pipeline;
pub mod traits;

pub use ffmpeg::{FfmpegEncoder, FfmpegThumbnailer, FfprobeProber};
pub use ladder::LadderProcessor;
pub use pipeline::VideoPipeline;
pub use traits::{HlsEncoder, MediaInfo, MediaProber, ThumbnailGenerator};
