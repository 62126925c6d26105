use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "processing_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl Display for ProcessingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ProcessingStatus::Pending => write!(f, "pending"),
            ProcessingStatus::Processing => write!(f, "processing"),
            ProcessingStatus::Completed => write!(f, "completed"),
            ProcessingStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A video record. Created externally with `Pending` status and an
/// attached source file; mutated only by the pipeline while a job for
/// its id is running.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Path to the source asset, relative to the media root or absolute.
    /// Processing cannot start without it.
    pub video_file: Option<String>,
    pub processing_status: ProcessingStatus,
    /// 0-100, non-decreasing within one job attempt. A retried attempt
    /// restarts at 0.
    pub processing_progress: i32,
    /// Set only when an attempt fails; cleared when a new attempt starts.
    pub processing_error: Option<String>,
    pub duration_seconds: Option<i64>,
    pub file_size_mb: Option<i64>,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    pub fn has_source_file(&self) -> bool {
        self.video_file.as_deref().is_some_and(|p| !p.is_empty())
    }
}
