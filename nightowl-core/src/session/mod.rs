//! Per-session counters and interaction history.
//!
//! A [`SessionState`] is created when a session starts and is mutated only
//! through its `record_*` methods while the session runs. Once
//! [`SessionState::finish`] has been called every mutator fails with
//! [`SessionError::Finished`] and leaves the counters untouched.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionError;
use crate::types::{Identity, InteractionOutcome, Source};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    id: Uuid,
    start_time: DateTime<Utc>,
    finish_time: Option<DateTime<Utc>>,
    my_username: Option<Identity>,
    total_interactions: BTreeMap<String, u64>,
    successful_interactions: BTreeMap<String, u64>,
    followed_per_source: BTreeMap<String, u64>,
    total_likes: u64,
    total_followed: u64,
    total_unfollowed: u64,
    total_comments: u64,
    total_private_messages: u64,
    total_story_watches: u64,
    last_interaction_at: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_time,
            finish_time: None,
            my_username: None,
            total_interactions: BTreeMap::new(),
            successful_interactions: BTreeMap::new(),
            followed_per_source: BTreeMap::new(),
            total_likes: 0,
            total_followed: 0,
            total_unfollowed: 0,
            total_comments: 0,
            total_private_messages: 0,
            total_story_watches: 0,
            last_interaction_at: None,
        }
    }

    pub fn start_now() -> Self {
        Self::new(Utc::now())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn finish_time(&self) -> Option<DateTime<Utc>> {
        self.finish_time
    }

    pub fn is_finished(&self) -> bool {
        self.finish_time.is_some()
    }

    pub fn my_username(&self) -> Option<&Identity> {
        self.my_username.as_ref()
    }

    pub fn total_interactions(&self) -> &BTreeMap<String, u64> {
        &self.total_interactions
    }

    pub fn successful_interactions(&self) -> &BTreeMap<String, u64> {
        &self.successful_interactions
    }

    pub fn interactions_for(&self, source: &Source) -> u64 {
        self.total_interactions.get(&source.key()).copied().unwrap_or(0)
    }

    pub fn successful_for(&self, source: &Source) -> u64 {
        self.successful_interactions
            .get(&source.key())
            .copied()
            .unwrap_or(0)
    }

    pub fn followed_for(&self, source: &Source) -> u64 {
        self.followed_per_source.get(&source.key()).copied().unwrap_or(0)
    }

    pub fn interactions_sum(&self) -> u64 {
        self.total_interactions.values().sum()
    }

    pub fn successful_sum(&self) -> u64 {
        self.successful_interactions.values().sum()
    }

    pub fn total_likes(&self) -> u64 {
        self.total_likes
    }

    pub fn total_followed(&self) -> u64 {
        self.total_followed
    }

    pub fn total_unfollowed(&self) -> u64 {
        self.total_unfollowed
    }

    pub fn total_comments(&self) -> u64 {
        self.total_comments
    }

    pub fn total_private_messages(&self) -> u64 {
        self.total_private_messages
    }

    pub fn total_story_watches(&self) -> u64 {
        self.total_story_watches
    }

    pub fn last_interaction_at(&self) -> Option<DateTime<Utc>> {
        self.last_interaction_at
    }

    /// Wall-clock duration of the session, measured to `now` while running.
    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        self.finish_time.unwrap_or(now) - self.start_time
    }

    pub fn set_identity(&mut self, identity: Identity) -> Result<(), SessionError> {
        self.ensure_running()?;
        self.my_username = Some(identity);
        Ok(())
    }

    /// Record one attempted interaction with a target found through `source`.
    ///
    /// `outcome.likes` is taken as the number of likes to count; callers cap it
    /// at the planned amount before recording.
    pub fn record_interaction(
        &mut self,
        source: &Source,
        outcome: &InteractionOutcome,
        at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        self.ensure_running()?;
        let key = source.key();
        *self.total_interactions.entry(key.clone()).or_insert(0) += 1;
        if outcome.succeeded {
            *self.successful_interactions.entry(key.clone()).or_insert(0) += 1;
        }
        if outcome.followed {
            self.total_followed += 1;
            *self.followed_per_source.entry(key).or_insert(0) += 1;
        }
        self.total_likes += u64::from(outcome.likes);
        if outcome.commented {
            self.total_comments += 1;
        }
        if outcome.messaged {
            self.total_private_messages += 1;
        }
        self.total_story_watches += u64::from(outcome.stories_watched);
        self.last_interaction_at = Some(match self.last_interaction_at {
            Some(prev) if prev > at => prev,
            _ => at,
        });
        Ok(())
    }

    pub fn record_unfollow(&mut self) -> Result<(), SessionError> {
        self.ensure_running()?;
        self.total_unfollowed += 1;
        Ok(())
    }

    /// Mark the session finished. Can only happen once.
    pub fn finish(&mut self, at: DateTime<Utc>) -> Result<(), SessionError> {
        self.ensure_running()?;
        if at < self.start_time {
            return Err(SessionError::FinishBeforeStart {
                start: self.start_time,
                finish: at,
            });
        }
        self.finish_time = Some(at);
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), SessionError> {
        if self.is_finished() {
            Err(SessionError::Finished(self.id))
        } else {
            Ok(())
        }
    }
}
