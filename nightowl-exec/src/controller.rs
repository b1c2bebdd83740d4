//! Session loop: open the app, run the mode's jobs, close, report, repeat.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use nightowl_core::{
    Identity, LimitRegistry, Mode, RunConfig, RunReport, SessionState, Source, ValueRange,
};
use nightowl_store::InteractionStore;
use tracing::{error, info, warn};

use crate::driver::{Collaborators, DriverError};
use crate::error::RunError;
use crate::events::{Event, EventSink};
use crate::interrupt::Interrupt;
use crate::job::{Job, JobOutcome, JobRunner, SourceJob, UnfollowJob};
use crate::report_sink::ReportSink;
use crate::retry::RetryConfig;

/// Sessions of the current run, in start order.
#[derive(Debug, Default)]
pub struct RunContext {
    sessions: Vec<SessionState>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions(&self) -> &[SessionState] {
        &self.sessions
    }

    pub fn report(&self) -> RunReport {
        RunReport::build(&self.sessions, Utc::now())
    }

    fn begin_session(&mut self, session: SessionState) -> &mut SessionState {
        let index = self.sessions.len();
        self.sessions.push(session);
        &mut self.sessions[index]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Finished,
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    Finished,
    LimitReached,
    Interrupted,
}

pub struct RunController {
    config: RunConfig,
    mode: Mode,
    retry: RetryConfig,
    collaborators: Collaborators,
    store: Arc<dyn InteractionStore>,
    events: Arc<dyn EventSink>,
    reports: Arc<dyn ReportSink>,
    interrupt: Interrupt,
    rng: fastrand::Rng,
}

impl RunController {
    /// Fails when the configuration names both or neither run mode.
    pub fn new(
        config: RunConfig,
        collaborators: Collaborators,
        store: Arc<dyn InteractionStore>,
        events: Arc<dyn EventSink>,
        reports: Arc<dyn ReportSink>,
        interrupt: Interrupt,
    ) -> Result<Self, RunError> {
        let mode = config.mode()?;
        let retry = RetryConfig::from(&config.retry);
        Ok(Self {
            config,
            mode,
            retry,
            collaborators,
            store,
            events,
            reports,
            interrupt,
            rng: fastrand::Rng::new(),
        })
    }

    pub fn with_rng(mut self, rng: fastrand::Rng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub async fn run(&mut self, ctx: &mut RunContext) -> Result<RunOutcome, RunError> {
        let mut index = 0u64;
        loop {
            index += 1;
            match self.run_session(ctx, index).await {
                Ok(SessionEnd::Interrupted) => {
                    self.emit_report(ctx);
                    return Ok(RunOutcome::Interrupted);
                }
                Ok(end) => {
                    info!(session = index, ?end, "session finished");
                }
                Err(e) => {
                    error!(session = index, error = %e, "run failed");
                    self.emit_report(ctx);
                    return Err(e);
                }
            }

            self.emit_report(ctx);
            let Some(repeat) = self.config.schedule.repeat else {
                return Ok(RunOutcome::Finished);
            };
            if self
                .config
                .schedule
                .total_sessions
                .is_some_and(|total| index >= total)
            {
                info!(sessions = index, "all sessions done");
                return Ok(RunOutcome::Finished);
            }

            let minutes = repeat.sample(|| self.rng.u64(..));
            info!(minutes, "sleeping until the next session");
            tokio::select! {
                biased;
                _ = self.interrupt.triggered() => {
                    info!(sessions = index, "interrupted while waiting for the next session");
                    self.emit_report(ctx);
                    return Ok(RunOutcome::Interrupted);
                }
                _ = tokio::time::sleep(Duration::from_secs(minutes * 60)) => {}
            }
        }
    }

    async fn run_session(&mut self, ctx: &mut RunContext, index: u64) -> Result<SessionEnd, RunError> {
        let session = ctx.begin_session(SessionState::start_now());
        let session_id = session.id();
        info!(session = index, %session_id, "starting session");
        self.events
            .emit(Event::SessionStarted {
                session_id,
                index: index as usize,
            })
            .await;

        let result = self.drive_session(session).await;

        if result.is_ok() && !matches!(result, Ok(SessionEnd::Interrupted)) {
            if let Err(e) = self.collaborators.device.close_app().await {
                warn!(error = %e, "failed to close the app");
            }
            session.finish(Utc::now())?;
            self.events
                .emit(Event::SessionFinished {
                    session_id,
                    interactions: session.interactions_sum(),
                    likes: session.total_likes(),
                })
                .await;
        }
        if let Err(e) = self.store.save_session(session).await {
            warn!(%session_id, error = %e, "failed to save session snapshot");
        }
        result
    }

    async fn drive_session(&mut self, session: &mut SessionState) -> Result<SessionEnd, RunError> {
        let identity = tokio::select! {
            biased;
            _ = self.interrupt.triggered() => return Ok(SessionEnd::Interrupted),
            r = open_and_identify(&self.collaborators) => r,
        };
        let identity = match identity {
            Ok(identity) => identity,
            Err(e) => {
                if let Err(snap) = self.collaborators.device.capture_snapshot("session-setup").await {
                    warn!(error = %snap, "could not capture diagnostic snapshot");
                }
                return Err(RunError::Setup(e.into()));
            }
        };
        info!(username = %identity, "logged in");
        session.set_identity(identity.clone())?;

        let limits = LimitRegistry::from_config(&self.config.limits, || self.rng.u64(..));
        let runner = JobRunner {
            limits: &limits,
            collaborators: &self.collaborators,
            store: self.store.as_ref(),
            events: self.events.as_ref(),
            retry: &self.retry,
            interrupt: &self.interrupt,
        };

        let mut jobs: Vec<Box<dyn Job>> = match &self.mode {
            Mode::Interact(sources) => {
                select_sources(sources, self.config.schedule.truncate_sources, &mut self.rng)
                    .into_iter()
                    .map(|source| {
                        let is_self = is_own_account(&source, &identity);
                        let rng = fastrand::Rng::with_seed(self.rng.u64(..));
                        Box::new(SourceJob::new(source, is_self, self.config.actions.clone(), rng))
                            as Box<dyn Job>
                    })
                    .collect()
            }
            Mode::Unfollow(count) => vec![Box::new(UnfollowJob::new(*count))],
        };

        for job in jobs.iter_mut() {
            match runner.run(job.as_mut(), session).await? {
                JobOutcome::Completed => {}
                JobOutcome::LimitReached(check) => {
                    info!(limits = ?check.kinds(), "session limit reached, ending session");
                    return Ok(SessionEnd::LimitReached);
                }
                JobOutcome::Interrupted => return Ok(SessionEnd::Interrupted),
            }
        }
        Ok(SessionEnd::Finished)
    }

    fn emit_report(&self, ctx: &RunContext) {
        self.reports.emit(&ctx.report());
    }
}

async fn open_and_identify(collaborators: &Collaborators) -> Result<Identity, DriverError> {
    collaborators.device.open_app().await?;
    collaborators.device.current_username().await
}

fn is_own_account(source: &Source, identity: &Identity) -> bool {
    matches!(source, Source::Followers(name) if name == identity.as_str())
}

/// Pick a random subset of `sources` sized by `truncate`, keeping their order.
pub fn select_sources(
    sources: &[Source],
    truncate: Option<ValueRange>,
    rng: &mut fastrand::Rng,
) -> Vec<Source> {
    let Some(range) = truncate else {
        return sources.to_vec();
    };
    let keep = usize::try_from(range.sample(|| rng.u64(..)))
        .unwrap_or(usize::MAX)
        .min(sources.len());
    let mut indices: Vec<usize> = (0..sources.len()).collect();
    rng.shuffle(&mut indices);
    indices.truncate(keep);
    indices.sort_unstable();
    indices.into_iter().map(|i| sources[i].clone()).collect()
}
