//! Job queue and worker runtime for the transcoding pipeline.

pub mod hooks;
pub mod queue;
pub mod runner;
pub mod setup;
pub mod telemetry;

pub use hooks::on_video_created;
pub use queue::{JobOutcome, JobPolicy, JobQueue, JobQueueConfig, JobSpec, JobStatus};
pub use runner::JobRunner;
