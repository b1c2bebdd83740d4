use async_trait::async_trait;
use chrono::Utc;
use nightowl_core::{LimitScope, LimitSelector, Source, UnfollowOutcome};
use tracing::{debug, info};

use crate::error::JobError;
use crate::events::Event;
use crate::job::{Job, JobContext, JobStatus};

/// Unfollow up to `count` accounts previously followed by nightowl, oldest
/// follows first. The unfollowed count survives retries, so a retry only
/// works on the remainder.
pub struct UnfollowJob {
    count: u64,
    done: u64,
}

impl UnfollowJob {
    pub fn new(count: u64) -> Self {
        Self { count, done: 0 }
    }

    pub fn done(&self) -> u64 {
        self.done
    }

    pub fn remaining(&self) -> u64 {
        self.count.saturating_sub(self.done)
    }
}

#[async_trait]
impl Job for UnfollowJob {
    fn name(&self) -> String {
        format!("unfollow {}", self.count)
    }

    fn source(&self) -> Option<&Source> {
        None
    }

    async fn run_once(&mut self, ctx: &mut JobContext<'_>) -> Result<JobStatus, JobError> {
        while self.remaining() > 0 {
            let batch = i64::try_from(self.remaining()).unwrap_or(i64::MAX);
            let candidates = ctx.store.followed_candidates(batch).await?;
            if candidates.is_empty() {
                info!(unfollowed = self.done, "no more followed accounts to unfollow");
                return Ok(JobStatus::Completed);
            }

            for candidate in candidates {
                let outcome = ctx.collaborators.unfollower.unfollow(&candidate.username).await?;
                // Every handled account leaves the pool, unfollowed or not.
                ctx.store.mark_unfollowed(&candidate.username, Utc::now()).await?;

                match outcome {
                    UnfollowOutcome::Unfollowed => {
                        ctx.session.record_unfollow()?;
                        self.done += 1;
                        ctx.events
                            .emit(Event::Unfollowed {
                                session_id: ctx.session.id(),
                                username: candidate.username.clone(),
                            })
                            .await;
                    }
                    UnfollowOutcome::NotFollowing => {
                        debug!(username = %candidate.username, "not following anymore");
                    }
                    UnfollowOutcome::Skipped { reason } => {
                        debug!(username = %candidate.username, %reason, "unfollow skipped");
                    }
                }

                let global = ctx.limits.check_logged(
                    ctx.session,
                    LimitSelector::Scope(LimitScope::Global),
                    None,
                    Utc::now(),
                );
                if global.any_reached() {
                    return Ok(JobStatus::LimitReached(global));
                }
                if self.remaining() == 0 {
                    break;
                }
            }
        }
        Ok(JobStatus::Completed)
    }
}
