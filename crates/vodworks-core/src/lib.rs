//! Core domain types for the Vodworks transcoding pipeline.
//!
//! This crate holds the video/variant models, the resolution ladder and
//! progress model, the media filesystem layout, configuration, and the
//! error taxonomy shared by the store, media and worker crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod job_error;
pub mod models;
pub mod paths;

pub use config::Config;
pub use error::PipelineError;
pub use job_error::JobError;
