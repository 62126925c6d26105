//! In-process job queue: submission, worker pool, timeout, retry and
//! outcome retention.
//!
//! Delivery is at-least-once: a timed-out attempt is treated as a
//! crash and retried like any other failure, so a job may execute more
//! than once for the same video id. Shutdown signals the pool to stop
//! accepting work; it does not wait for in-flight jobs.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tokio::time::sleep;
use uuid::Uuid;

use vodworks_core::Config;

use crate::runner::JobRunner;

/// Logical task name carried on every submission record.
pub const JOB_TASK_NAME: &str = "process_video";

/// Execution policy attached to every job at enqueue time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPolicy {
    /// Budget per attempt; the attempt is killed and counted as failed
    /// when exceeded.
    pub timeout: Duration,
    /// Extra attempts after the first failure.
    pub max_retries: u32,
    /// Delay before each retry, one entry per retry; the last entry
    /// repeats if retries outnumber entries.
    pub retry_backoff: Vec<Duration>,
    /// Retention of successful outcomes.
    pub result_ttl: Duration,
    /// Retention of failed outcomes.
    pub failure_ttl: Duration,
}

impl Default for JobPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(3600),
            max_retries: 3,
            retry_backoff: vec![
                Duration::from_secs(60),
                Duration::from_secs(300),
                Duration::from_secs(900),
            ],
            result_ttl: Duration::from_secs(24 * 3600),
            failure_ttl: Duration::from_secs(7 * 24 * 3600),
        }
    }
}

impl JobPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.job_timeout_seconds),
            max_retries: config.job_max_retries,
            retry_backoff: config
                .job_retry_backoff_seconds
                .iter()
                .map(|s| Duration::from_secs(*s))
                .collect(),
            result_ttl: Duration::from_secs(config.job_result_ttl_seconds),
            failure_ttl: Duration::from_secs(config.job_failure_ttl_seconds),
        }
    }

    /// Delay before retry `retry_index` (0-based), clamped to the last
    /// configured entry.
    pub fn backoff_delay(&self, retry_index: u32) -> Duration {
        self.retry_backoff
            .get(retry_index as usize)
            .or_else(|| self.retry_backoff.last())
            .copied()
            .unwrap_or(Duration::from_secs(60))
    }
}

/// One queued unit of work.
#[derive(Debug, Clone)]
pub struct JobSpec {
    pub id: Uuid,
    pub task: &'static str,
    pub video_id: Uuid,
    pub description: String,
    pub policy: JobPolicy,
    pub enqueued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Completed,
    Failed,
}

/// Terminal state of one job, retained for the policy's TTL.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub video_id: Uuid,
    pub status: JobStatus,
    pub error: Option<String>,
    pub attempts: u32,
    finished_at: Instant,
    ttl: Duration,
}

impl JobOutcome {
    fn is_expired(&self) -> bool {
        self.finished_at.elapsed() >= self.ttl
    }
}

type OutcomeMap = Arc<Mutex<HashMap<Uuid, JobOutcome>>>;

#[derive(Clone)]
pub struct JobQueueConfig {
    pub max_workers: usize,
    pub queue_capacity: usize,
    pub policy: JobPolicy,
}

impl Default for JobQueueConfig {
    fn default() -> Self {
        Self {
            max_workers: 4,
            queue_capacity: 256,
            policy: JobPolicy::default(),
        }
    }
}

pub struct JobQueue {
    tx: mpsc::Sender<JobSpec>,
    policy: JobPolicy,
    outcomes: OutcomeMap,
    shutdown_tx: mpsc::Sender<()>,
}

impl JobQueue {
    /// Create a queue and spawn its worker pool. The pool holds a weak
    /// reference to the runner; jobs fail if the runner is dropped.
    pub fn new(runner: Weak<dyn JobRunner>, config: JobQueueConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.queue_capacity);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let outcomes: OutcomeMap = Arc::new(Mutex::new(HashMap::new()));

        let pool_outcomes = outcomes.clone();
        let max_workers = config.max_workers;
        tokio::spawn(async move {
            Self::worker_pool(rx, shutdown_rx, runner, max_workers, pool_outcomes).await;
        });

        Self {
            tx,
            policy: config.policy,
            outcomes,
            shutdown_tx,
        }
    }

    /// Submit a processing job for a video.
    ///
    /// A submission failure (queue unavailable) propagates to the
    /// caller; it is not retried here.
    pub async fn enqueue_video(&self, video_id: Uuid) -> Result<Uuid> {
        let spec = JobSpec {
            id: Uuid::new_v4(),
            task: JOB_TASK_NAME,
            video_id,
            description: format!("HLS processing for video {}", video_id),
            policy: self.policy.clone(),
            enqueued_at: Utc::now(),
        };
        let job_id = spec.id;

        self.tx
            .send(spec)
            .await
            .map_err(|_| anyhow!("Job queue is not accepting submissions"))?;

        tracing::info!(video_id = %video_id, job_id = %job_id, "Video queued for processing");
        Ok(job_id)
    }

    /// Terminal outcome of a job, if still within its retention window.
    pub fn outcome(&self, job_id: Uuid) -> Option<JobOutcome> {
        let mut outcomes = self.outcomes.lock().unwrap();
        outcomes.retain(|_, o| !o.is_expired());
        outcomes.get(&job_id).cloned()
    }

    /// Signal the pool to stop; in-flight jobs are not awaited.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }

    async fn worker_pool(
        mut rx: mpsc::Receiver<JobSpec>,
        mut shutdown_rx: mpsc::Receiver<()>,
        runner: Weak<dyn JobRunner>,
        max_workers: usize,
        outcomes: OutcomeMap,
    ) {
        tracing::info!(max_workers, "Job queue worker pool started");
        let semaphore = Arc::new(Semaphore::new(max_workers));

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("Job queue worker pool shutting down");
                    break;
                }
                received = rx.recv() => {
                    let Some(spec) = received else { break };
                    let permit = match semaphore.clone().acquire_owned().await {
                        Ok(permit) => permit,
                        Err(_) => break,
                    };
                    let runner = runner.clone();
                    let outcomes = outcomes.clone();
                    tokio::spawn(async move {
                        let _permit = permit;
                        Self::run_job(spec, runner, outcomes).await;
                    });
                }
            }
        }

        tracing::info!("Job queue worker pool stopped");
    }

    #[tracing::instrument(skip(spec, runner, outcomes), fields(job_id = %spec.id, video_id = %spec.video_id))]
    async fn run_job(spec: JobSpec, runner: Weak<dyn JobRunner>, outcomes: OutcomeMap) {
        let max_attempts = spec.policy.max_retries + 1;
        let mut attempts = 0u32;

        let error = loop {
            attempts += 1;
            let Some(runner) = runner.upgrade() else {
                break Some("job runner was dropped".to_string());
            };

            match tokio::time::timeout(spec.policy.timeout, runner.process_video(spec.video_id))
                .await
            {
                Ok(Ok(())) => break None,
                Ok(Err(err)) => {
                    if !err.is_recoverable() {
                        tracing::error!(
                            error = %err,
                            attempt = attempts,
                            "Job failed with unrecoverable error, not retrying"
                        );
                        break Some(err.to_string());
                    }
                    if attempts >= max_attempts {
                        tracing::error!(
                            error = %err,
                            attempts,
                            "Job failed after exhausting retries"
                        );
                        break Some(err.to_string());
                    }
                    let delay = spec.policy.backoff_delay(attempts - 1);
                    tracing::warn!(
                        error = %err,
                        attempt = attempts,
                        delay_secs = delay.as_secs(),
                        "Job attempt failed, retrying after backoff"
                    );
                    sleep(delay).await;
                }
                Err(_) => {
                    // Exceeding the budget is treated as a crash.
                    let timeout_error =
                        format!("job timed out after {}s", spec.policy.timeout.as_secs());
                    if attempts >= max_attempts {
                        tracing::error!(attempts, "Job timed out, retries exhausted");
                        break Some(timeout_error);
                    }
                    let delay = spec.policy.backoff_delay(attempts - 1);
                    tracing::warn!(
                        attempt = attempts,
                        delay_secs = delay.as_secs(),
                        "Job attempt timed out, retrying after backoff"
                    );
                    sleep(delay).await;
                }
            }
        };

        let (status, ttl) = match error {
            None => (JobStatus::Completed, spec.policy.result_ttl),
            Some(_) => (JobStatus::Failed, spec.policy.failure_ttl),
        };
        let outcome = JobOutcome {
            video_id: spec.video_id,
            status,
            error,
            attempts,
            finished_at: Instant::now(),
            ttl,
        };

        let mut map = outcomes.lock().unwrap();
        map.retain(|_, o| !o.is_expired());
        map.insert(spec.id, outcome);
    }
}
