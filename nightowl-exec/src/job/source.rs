use async_trait::async_trait;
use chrono::Utc;
use nightowl_core::{
    ActionConfig, LimitCheck, LimitRegistry, LimitScope, LimitSelector, SessionState, Source,
    Target,
};
use nightowl_store::InteractionStore;
use tracing::{debug, info};

use crate::dispatch::Dispatcher;
use crate::driver::{Flow, TargetVisitor, WalkRequest};
use crate::error::JobError;
use crate::events::{Event, EventSink};
use crate::job::{Job, JobContext, JobStatus};

/// Interact with candidates from one source until it runs dry or a limit
/// is reached. A retry restarts the walk; already visited accounts are
/// skipped through the store.
pub struct SourceJob {
    source: Source,
    is_self: bool,
    actions: ActionConfig,
    rng: fastrand::Rng,
}

impl SourceJob {
    pub fn new(source: Source, is_self: bool, actions: ActionConfig, rng: fastrand::Rng) -> Self {
        Self {
            source,
            is_self,
            actions,
            rng,
        }
    }
}

#[async_trait]
impl Job for SourceJob {
    fn name(&self) -> String {
        format!("interact {}", self.source)
    }

    fn source(&self) -> Option<&Source> {
        Some(&self.source)
    }

    async fn run_once(&mut self, ctx: &mut JobContext<'_>) -> Result<JobStatus, JobError> {
        if self.is_self {
            info!(source = %self.source, "walking own followers");
        }
        let request = WalkRequest {
            source: self.source.clone(),
            is_self: self.is_self,
            interact_percentage: self.actions.interact_percentage,
        };

        let walker = ctx.collaborators.walker.clone();
        let mut visitor = SourceVisitor {
            dispatcher: Dispatcher {
                interactor: ctx.collaborators.interactor.as_ref(),
                filter: ctx.collaborators.filter.as_ref(),
                store: ctx.store,
                limits: ctx.limits,
                actions: &self.actions,
                rng: &mut self.rng,
            },
            session: &mut *ctx.session,
            limits: ctx.limits,
            store: ctx.store,
            events: ctx.events,
            source: &self.source,
            stopped_by: None,
        };
        walker.walk(&request, &mut visitor).await?;

        Ok(match visitor.stopped_by {
            Some(check) => JobStatus::LimitReached(check),
            None => JobStatus::Completed,
        })
    }
}

struct SourceVisitor<'a> {
    dispatcher: Dispatcher<'a>,
    session: &'a mut SessionState,
    limits: &'a LimitRegistry,
    store: &'a dyn InteractionStore,
    events: &'a dyn EventSink,
    source: &'a Source,
    stopped_by: Option<LimitCheck>,
}

#[async_trait]
impl TargetVisitor for SourceVisitor<'_> {
    async fn visit(&mut self, target: Target) -> Result<Flow, JobError> {
        if self.store.was_interacted(&target.username).await? {
            debug!(username = %target.username, "already interacted, skipping");
            return Ok(Flow::Continue);
        }

        let outcome = self.dispatcher.dispatch(self.session, &target).await?;
        self.events
            .emit(Event::InteractionRecorded {
                session_id: self.session.id(),
                username: target.username.clone(),
                source: target.source.key(),
                succeeded: outcome.succeeded,
            })
            .await;

        // Limits are checked strictly after each dispatch, so the target that
        // crosses a limit is still completed.
        let now = Utc::now();
        let global = self.limits.check_logged(
            self.session,
            LimitSelector::Scope(LimitScope::Global),
            None,
            now,
        );
        if global.any_reached() {
            self.stopped_by = Some(global);
            return Ok(Flow::Stop);
        }
        let per_source = self.limits.check_logged(
            self.session,
            LimitSelector::Scope(LimitScope::PerSource),
            Some(self.source),
            now,
        );
        if per_source.any_reached() {
            info!(source = %self.source, "source limit reached, moving on");
            return Ok(Flow::Stop);
        }
        Ok(Flow::Continue)
    }
}
