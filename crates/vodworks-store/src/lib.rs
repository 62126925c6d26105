//! Record store for the transcoding pipeline.
//!
//! The pipeline depends on the [`VideoRepository`] and
//! [`VariantRepository`] traits; this crate also ships the Postgres
//! implementations used by the worker binary. All status/progress
//! writes are single-statement field updates (last-write-wins, no
//! record locking).

pub mod traits;
pub mod variant;
pub mod video;

pub use traits::{VariantRepository, VideoRepository};
pub use variant::PgVariantRepository;
pub use video::PgVideoRepository;
