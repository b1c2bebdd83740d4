#![forbid(unsafe_code)]

//! Runtime for nightowl runs: collaborator traits, the interaction
//! dispatcher, jobs with their retry loop, and the multi-session controller.

pub mod controller;
pub mod dispatch;
pub mod driver;
pub mod error;
pub mod events;
pub mod interrupt;
pub mod job;
pub mod report_sink;
pub mod retry;

pub use crate::controller::{select_sources, RunContext, RunController, RunOutcome};
pub use crate::dispatch::{sample_plan, Dispatcher};
pub use crate::driver::{
    AcceptAll, Collaborators, Device, DriverError, DriverErrorKind, Flow, Interactor,
    ProcessDriver, ProcessDriverConfig, ProfileFilter, SourceWalker, TargetVisitor, Unfollower,
    WalkRequest,
};
pub use crate::error::{JobError, RunError};
pub use crate::events::{
    CompositeEventSink, Event, EventSink, NoOpEventSink, StdoutEventSink, StoreEventSink,
    TracingEventSink,
};
pub use crate::interrupt::{Interrupt, InterruptHandle};
pub use crate::job::{Job, JobContext, JobOutcome, JobRunner, JobStatus, SourceJob, UnfollowJob};
pub use crate::report_sink::{MemoryReportSink, ReportFormat, ReportSink, StdoutReportSink};
pub use crate::retry::{decide_retry, RetryConfig, RetryDecision, RetryReason};
