use nightowl_core::{ConfigError, SessionError};
use nightowl_store::StoreError;

use crate::driver::DriverError;

/// Failure of a single job attempt.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("driver: {0}")]
    Driver(#[from] DriverError),
    #[error("session: {0}")]
    Session(#[from] SessionError),
    #[error("store: {0}")]
    Store(#[from] StoreError),
}

impl JobError {
    pub fn is_transient(&self) -> bool {
        matches!(self, JobError::Driver(e) if e.is_transient())
    }
}

/// Errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("job `{job}` failed: {source}")]
    Fatal {
        job: String,
        #[source]
        source: JobError,
    },
    #[error("job `{job}` gave up after {attempts} attempts: {source}")]
    RetriesExhausted {
        job: String,
        attempts: usize,
        #[source]
        source: JobError,
    },
    #[error("recovery after a transient error failed: {0}")]
    Recovery(#[source] DriverError),
    #[error("session setup failed: {0}")]
    Setup(#[source] JobError),
    #[error("session: {0}")]
    Session(#[from] SessionError),
}
