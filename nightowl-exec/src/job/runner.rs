use std::time::Duration;

use chrono::Utc;
use nightowl_core::{
    Identity, LimitCheck, LimitRegistry, LimitScope, LimitSelector, SessionState,
};
use nightowl_store::InteractionStore;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::driver::{Collaborators, DriverError};
use crate::error::RunError;
use crate::events::{Event, EventSink};
use crate::interrupt::Interrupt;
use crate::job::{Job, JobContext, JobOutcome, JobStatus};
use crate::retry::{decide_retry, RetryConfig, RetryDecision, RetryReason};

/// Runs one job to completion, recovering from transient driver errors by
/// restarting the app.
///
/// Limits are checked before every attempt: a reached global limit stops the
/// run, a reached per-source limit completes the job without starting it.
pub struct JobRunner<'a> {
    pub limits: &'a LimitRegistry,
    pub collaborators: &'a Collaborators,
    pub store: &'a dyn InteractionStore,
    pub events: &'a dyn EventSink,
    pub retry: &'a RetryConfig,
    pub interrupt: &'a Interrupt,
}

impl JobRunner<'_> {
    pub async fn run(
        &self,
        job: &mut dyn Job,
        session: &mut SessionState,
    ) -> Result<JobOutcome, RunError> {
        let name = job.name();
        let session_id = session.id();
        let mut attempt_no = 0usize;

        loop {
            let now = Utc::now();
            let global = self.limits.check_logged(
                session,
                LimitSelector::Scope(LimitScope::Global),
                None,
                now,
            );
            if global.any_reached() {
                self.emit_limit(session_id, &name, &global).await;
                return Ok(JobOutcome::LimitReached(global));
            }
            if let Some(source) = job.source() {
                let per_source = self.limits.check_logged(
                    session,
                    LimitSelector::Scope(LimitScope::PerSource),
                    Some(source),
                    now,
                );
                if per_source.any_reached() {
                    info!(job = %name, "source limit already reached, skipping");
                    return Ok(JobOutcome::Completed);
                }
            }

            attempt_no += 1;
            info!(job = %name, attempt_no, "starting job");
            self.events
                .emit(Event::JobStarted {
                    session_id,
                    job: name.clone(),
                    attempt_no,
                })
                .await;

            let result = {
                let mut ctx = JobContext {
                    session: &mut *session,
                    limits: self.limits,
                    collaborators: self.collaborators,
                    store: self.store,
                    events: self.events,
                };
                tokio::select! {
                    biased;
                    _ = self.interrupt.triggered() => None,
                    r = job.run_once(&mut ctx) => Some(r),
                }
            };
            let Some(result) = result else {
                warn!(job = %name, "interrupted");
                return Ok(JobOutcome::Interrupted);
            };

            let err = match result {
                Ok(JobStatus::Completed) => {
                    info!(job = %name, "job completed");
                    self.events
                        .emit(Event::JobCompleted {
                            session_id,
                            job: name.clone(),
                        })
                        .await;
                    return Ok(JobOutcome::Completed);
                }
                Ok(JobStatus::LimitReached(check)) => {
                    self.emit_limit(session_id, &name, &check).await;
                    return Ok(JobOutcome::LimitReached(check));
                }
                Err(err) => err,
            };

            self.snapshot(&name).await;

            match decide_retry(self.retry, attempt_no, &err, || fastrand::u64(..)) {
                RetryDecision::RetryAfter { delay, .. } => {
                    warn!(
                        job = %name,
                        attempt_no,
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "transient error, restarting the app"
                    );
                    self.events
                        .emit(Event::JobRetryScheduled {
                            session_id,
                            job: name.clone(),
                            attempt_no,
                            delay_ms: delay.as_millis() as u64,
                            error: err.to_string(),
                        })
                        .await;

                    let identity = tokio::select! {
                        biased;
                        _ = self.interrupt.triggered() => None,
                        r = self.recover(delay) => Some(r),
                    };
                    match identity {
                        None => {
                            warn!(job = %name, "interrupted during recovery");
                            return Ok(JobOutcome::Interrupted);
                        }
                        Some(Err(e)) => {
                            error!(job = %name, error = %e, "recovery failed");
                            self.emit_aborted(session_id, &name, e.to_string()).await;
                            return Err(RunError::Recovery(e));
                        }
                        Some(Ok(identity)) => {
                            session.set_identity(identity).map_err(|e| RunError::Fatal {
                                job: name.clone(),
                                source: e.into(),
                            })?;
                        }
                    }
                }
                RetryDecision::Stop { reason } => {
                    error!(job = %name, attempt_no, error = %err, "job failed");
                    self.emit_aborted(session_id, &name, err.to_string()).await;
                    return Err(match reason {
                        RetryReason::AttemptsExhausted => RunError::RetriesExhausted {
                            job: name,
                            attempts: attempt_no,
                            source: err,
                        },
                        _ => RunError::Fatal {
                            job: name,
                            source: err,
                        },
                    });
                }
            }
        }
    }

    /// Close the app, wait, reopen it and resolve the identity again.
    async fn recover(&self, delay: Duration) -> Result<Identity, DriverError> {
        let device = &self.collaborators.device;
        device.close_app().await?;
        tokio::time::sleep(delay).await;
        device.open_app().await?;
        device.current_username().await
    }

    async fn snapshot(&self, job: &str) {
        let label = format!("{}-{}", job.replace(' ', "_"), Utc::now().format("%Y%m%d%H%M%S"));
        if let Err(e) = self.collaborators.device.capture_snapshot(&label).await {
            warn!(job, error = %e, "could not capture diagnostic snapshot");
        }
    }

    async fn emit_limit(&self, session_id: Uuid, job: &str, check: &LimitCheck) {
        self.events
            .emit(Event::LimitReached {
                session_id,
                job: job.to_string(),
                limits: check.kinds().iter().map(|k| k.as_str().to_string()).collect(),
            })
            .await;
    }

    async fn emit_aborted(&self, session_id: Uuid, job: &str, error: String) {
        self.events
            .emit(Event::JobAborted {
                session_id,
                job: job.to_string(),
                error,
            })
            .await;
    }
}
