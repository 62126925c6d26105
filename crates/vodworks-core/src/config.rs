//! Configuration module
//!
//! Environment-driven configuration for the worker service: database,
//! media root, external tool paths, and job queue policy.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

use crate::constants::DEFAULT_HLS_SEGMENT_DURATION;

const DB_MAX_CONNECTIONS: u32 = 20;
const DB_TIMEOUT_SECS: u64 = 30;
const WORKER_MAX_WORKERS: usize = 4;
const JOB_TIMEOUT_SECS: u64 = 3600;
const JOB_MAX_RETRIES: u32 = 3;
const JOB_RESULT_TTL_SECS: u64 = 24 * 3600;
const JOB_FAILURE_TTL_SECS: u64 = 7 * 24 * 3600;

/// Application configuration (transcoding worker).
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Root directory holding sources, HLS output and thumbnails.
    pub media_root: String,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub hls_segment_duration: u64,
    pub worker_max_workers: usize,
    /// Execution budget per job attempt; the queue kills and retries
    /// attempts that exceed it.
    pub job_timeout_seconds: u64,
    pub job_max_retries: u32,
    /// Delays between attempts, one entry per retry.
    pub job_retry_backoff_seconds: Vec<u64>,
    pub job_result_ttl_seconds: u64,
    pub job_failure_ttl_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL environment variable is required")?,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DB_MAX_CONNECTIONS)?,
            db_timeout_seconds: env_parse("DB_TIMEOUT_SECONDS", DB_TIMEOUT_SECS)?,
            media_root: env_or("MEDIA_ROOT", "./media"),
            ffmpeg_path: env_or("FFMPEG_PATH", "ffmpeg"),
            ffprobe_path: env_or("FFPROBE_PATH", "ffprobe"),
            hls_segment_duration: env_parse(
                "HLS_SEGMENT_DURATION",
                DEFAULT_HLS_SEGMENT_DURATION,
            )?,
            worker_max_workers: env_parse("WORKER_MAX_WORKERS", WORKER_MAX_WORKERS)?,
            job_timeout_seconds: env_parse("JOB_TIMEOUT_SECONDS", JOB_TIMEOUT_SECS)?,
            job_max_retries: env_parse("JOB_MAX_RETRIES", JOB_MAX_RETRIES)?,
            job_retry_backoff_seconds: parse_backoff_list(
                &env_or("JOB_RETRY_BACKOFF_SECONDS", "60,300,900"),
            )?,
            job_result_ttl_seconds: env_parse("JOB_RESULT_TTL_SECONDS", JOB_RESULT_TTL_SECS)?,
            job_failure_ttl_seconds: env_parse(
                "JOB_FAILURE_TTL_SECONDS",
                JOB_FAILURE_TTL_SECS,
            )?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Invalid value for {}: {}", key, raw)),
        Err(_) => Ok(default),
    }
}

/// Parse a comma-separated backoff list such as `"60,300,900"`.
fn parse_backoff_list(raw: &str) -> Result<Vec<u64>> {
    let delays = raw
        .split(',')
        .map(|s| {
            s.trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid backoff entry: {}", s))
        })
        .collect::<Result<Vec<u64>>>()?;
    anyhow::ensure!(!delays.is_empty(), "Backoff list must not be empty");
    Ok(delays)
}
