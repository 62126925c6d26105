//! Job execution error type.
//!
//! Wraps a failure with a recoverable flag so the queue can decide
//! whether an attempt is worth retrying. Unrecoverable errors fail the
//! job immediately without burning the retry budget; everything else is
//! retried according to the job policy.

use std::fmt;

use crate::error::PipelineError;

#[derive(Debug)]
pub struct JobError {
    inner: anyhow::Error,
    recoverable: bool,
}

impl JobError {
    /// An error that will not change on retry (missing record, invalid
    /// input). The job fails immediately.
    pub fn unrecoverable(err: impl Into<anyhow::Error>) -> Self {
        Self {
            inner: err.into(),
            recoverable: false,
        }
    }

    /// A transient failure; retried according to the job's retry policy.
    pub fn recoverable(err: impl Into<anyhow::Error>) -> Self {
        Self {
            inner: err.into(),
            recoverable: true,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.recoverable
    }

    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    pub fn into_inner(self) -> anyhow::Error {
        self.inner
    }
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::error::Error for JobError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

impl From<PipelineError> for JobError {
    fn from(err: PipelineError) -> Self {
        let recoverable = err.is_retryable();
        Self {
            inner: anyhow::Error::new(err),
            recoverable,
        }
    }
}

impl From<anyhow::Error> for JobError {
    /// Plain errors default to recoverable.
    fn from(err: anyhow::Error) -> Self {
        Self::recoverable(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn pipeline_errors_map_to_recoverability() {
        let e = JobError::from(PipelineError::VideoNotFound(Uuid::new_v4()));
        assert!(!e.is_recoverable());

        let e = JobError::from(PipelineError::Probe("truncated".into()));
        assert!(e.is_recoverable());
    }

    #[test]
    fn anyhow_defaults_to_recoverable() {
        let e = JobError::from(anyhow::anyhow!("network"));
        assert!(e.is_recoverable());
    }
}
