use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

/// Resolution tier of one HLS rendition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "resolution"))]
pub enum Resolution {
    #[serde(rename = "360p")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "360p"))]
    R360p,
    #[serde(rename = "480p")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "480p"))]
    R480p,
    #[serde(rename = "720p")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "720p"))]
    R720p,
    #[serde(rename = "1080p")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "1080p"))]
    R1080p,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::R360p => "360p",
            Resolution::R480p => "480p",
            Resolution::R720p => "720p",
            Resolution::R1080p => "1080p",
        }
    }
}

impl Display for Resolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "360p" => Ok(Resolution::R360p),
            "480p" => Ok(Resolution::R480p),
            "720p" => Ok(Resolution::R720p),
            "1080p" => Ok(Resolution::R1080p),
            other => Err(format!("unknown resolution: {}", other)),
        }
    }
}

/// One resolution's HLS output for one video.
///
/// At most one variant exists per `(video_id, resolution)` pair;
/// creation is an upsert on that pair so re-runs are idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StreamVariant {
    pub id: Uuid,
    pub video_id: Uuid,
    pub resolution: Resolution,
    /// Playlist path, relative to the media root unless absolute.
    pub manifest_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
