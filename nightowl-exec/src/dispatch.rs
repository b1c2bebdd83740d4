use chrono::Utc;
use nightowl_core::{ActionConfig, ActionPlan, InteractionOutcome, LimitRegistry, SessionState, Target};
use nightowl_store::{InteractionStore, NewInteraction};
use tracing::debug;

use crate::driver::{Interactor, ProfileFilter};
use crate::error::JobError;

/// Outcome failure recorded for targets the profile filter declined.
pub const FILTERED: &str = "filtered";

/// Sample the actions for one target. Every action kind rolls independently.
pub fn sample_plan(actions: &ActionConfig, follow_allowed: bool, rng: &mut fastrand::Rng) -> ActionPlan {
    let likes = if actions.likes_percentage.roll(|| rng.u64(..)) {
        to_u32(actions.likes_count.sample(|| rng.u64(..)))
    } else {
        0
    };
    let follow = actions.follow_percentage.roll(|| rng.u64(..)) && follow_allowed;
    let comment = actions.comment_percentage.roll(|| rng.u64(..));
    let stories = if actions.stories_percentage.roll(|| rng.u64(..)) {
        to_u32(actions.stories_count.sample(|| rng.u64(..)))
    } else {
        0
    };
    let private_message = actions.pm_percentage.roll(|| rng.u64(..));

    ActionPlan {
        likes,
        follow,
        comment,
        stories,
        private_message,
    }
}

fn to_u32(v: u64) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

/// Interacts with one target and records the outcome.
///
/// Never catches driver errors; recovery belongs to the job retry loop.
pub struct Dispatcher<'a> {
    pub interactor: &'a dyn Interactor,
    pub filter: &'a dyn ProfileFilter,
    pub store: &'a dyn InteractionStore,
    pub limits: &'a LimitRegistry,
    pub actions: &'a ActionConfig,
    pub rng: &'a mut fastrand::Rng,
}

impl Dispatcher<'_> {
    pub async fn dispatch(
        &mut self,
        session: &mut SessionState,
        target: &Target,
    ) -> Result<InteractionOutcome, JobError> {
        // The walker has already opened the profile, so a filtered target
        // still counts as an attempt.
        let outcome = if !self.filter.should_interact(target).await? {
            debug!(username = %target.username, "profile filtered out");
            InteractionOutcome::failed(FILTERED)
        } else {
            let follow_allowed = !self
                .limits
                .is_follow_limit_reached_for_source(session, &target.source);
            let plan = sample_plan(self.actions, follow_allowed, self.rng);
            debug!(username = %target.username, ?plan, "interacting");
            let outcome = self.interactor.interact(target, &plan).await?;
            clamp_to_plan(outcome, &plan)
        };

        let now = Utc::now();
        session.record_interaction(&target.source, &outcome, now)?;
        self.store
            .record_interaction(NewInteraction::from_outcome(session.id(), target, &outcome, now))
            .await?;
        Ok(outcome)
    }
}

// The driver may report more than was asked for; only planned actions count.
fn clamp_to_plan(mut outcome: InteractionOutcome, plan: &ActionPlan) -> InteractionOutcome {
    outcome.likes = outcome.likes.min(plan.likes);
    outcome.followed &= plan.follow;
    outcome.commented &= plan.comment;
    outcome.stories_watched = outcome.stories_watched.min(plan.stories);
    outcome.messaged &= plan.private_message;
    outcome
}
