//! Jobs and the retry loop that drives them.

mod runner;
mod source;
mod unfollow;

use async_trait::async_trait;
use nightowl_core::{LimitCheck, LimitRegistry, SessionState, Source};
use nightowl_store::InteractionStore;

use crate::driver::Collaborators;
use crate::error::JobError;
use crate::events::EventSink;

pub use runner::JobRunner;
pub use source::SourceJob;
pub use unfollow::UnfollowJob;

/// Result of one work attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Completed,
    /// A global limit was reached mid-job; the run must stop.
    LimitReached(LimitCheck),
}

/// Final result of a job after the retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed,
    LimitReached(LimitCheck),
    Interrupted,
}

/// Everything a job attempt may touch. Rebuilt for every attempt.
pub struct JobContext<'a> {
    pub session: &'a mut SessionState,
    pub limits: &'a LimitRegistry,
    pub collaborators: &'a Collaborators,
    pub store: &'a dyn InteractionStore,
    pub events: &'a dyn EventSink,
}

#[async_trait]
pub trait Job: Send {
    fn name(&self) -> String;

    /// Source whose per-source limits apply, if any.
    fn source(&self) -> Option<&Source>;

    /// One attempt at the job, from its beginning. Progress the job wants to
    /// keep across retries lives in the job itself.
    async fn run_once(&mut self, ctx: &mut JobContext<'_>) -> Result<JobStatus, JobError>;
}
