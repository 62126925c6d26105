//! Resolution ladder configuration.
//!
//! The ladder is a fixed ordered list; order defines both encoding order
//! and the denominator of the progress fraction, so it must be stable
//! across runs.

use serde::{Deserialize, Serialize};

use super::variant::Resolution;
use crate::constants::LADDER_PROGRESS_CEILING;

/// Encoding target for one rung of the ladder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolutionProfile {
    pub resolution: Resolution,
    /// Target vertical dimension; the horizontal dimension is computed
    /// to preserve aspect ratio and stay even.
    pub height: u32,
    pub bitrate_kbps: u32,
}

/// The default encoding ladder, lowest rung first.
pub fn default_ladder() -> Vec<ResolutionProfile> {
    vec![
        ResolutionProfile {
            resolution: Resolution::R360p,
            height: 360,
            bitrate_kbps: 800,
        },
        ResolutionProfile {
            resolution: Resolution::R480p,
            height: 480,
            bitrate_kbps: 1200,
        },
        ResolutionProfile {
            resolution: Resolution::R720p,
            height: 720,
            bitrate_kbps: 2500,
        },
        ResolutionProfile {
            resolution: Resolution::R1080p,
            height: 1080,
            bitrate_kbps: 5000,
        },
    ]
}

/// Progress checkpoint persisted after rung `index` (0-based) of a
/// ladder with `total` rungs: `floor((index + 1) / total * 80)`.
pub fn ladder_progress(index: usize, total: usize) -> i32 {
    debug_assert!(total > 0 && index < total);
    ((index + 1) * LADDER_PROGRESS_CEILING as usize / total) as i32
}
