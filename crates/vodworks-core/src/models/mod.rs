//! Domain models

pub mod profile;
pub mod variant;
pub mod video;

pub use profile::{default_ladder, ladder_progress, ResolutionProfile};
pub use variant::{Resolution, StreamVariant};
pub use video::{ProcessingStatus, Video};
