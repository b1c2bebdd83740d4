//! Process-local store for `--store memory` runs and tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nightowl_core::SessionState;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::store::{
    FollowedUser, InteractionRecord, InteractionStore, NewEvent, NewInteraction, StoreError,
    StoredEvent,
};

#[derive(Default)]
struct Inner {
    interactions: Vec<InteractionRecord>,
    // Insertion order doubles as follow order.
    followed: Vec<FollowedUser>,
    sessions: BTreeMap<Uuid, SessionState>,
    events: Vec<StoredEvent>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the followed-user ledger, as if nightowl had followed `username`.
    pub async fn seed_followed(&self, username: &str, source: &str, at: DateTime<Utc>) {
        let mut inner = self.inner.lock().await;
        upsert_followed(&mut inner.followed, username, source, at);
    }

    pub async fn interactions(&self) -> Vec<InteractionRecord> {
        self.inner.lock().await.interactions.clone()
    }

    pub async fn followed(&self) -> Vec<FollowedUser> {
        self.inner.lock().await.followed.clone()
    }

    pub async fn events(&self) -> Vec<StoredEvent> {
        self.inner.lock().await.events.clone()
    }
}

fn upsert_followed(followed: &mut Vec<FollowedUser>, username: &str, source: &str, at: DateTime<Utc>) {
    followed.retain(|f| f.username != username);
    followed.push(FollowedUser {
        username: username.to_string(),
        source: source.to_string(),
        followed_at: at,
        unfollowed_at: None,
    });
}

#[async_trait]
impl InteractionStore for MemoryStore {
    async fn record_interaction(&self, i: NewInteraction) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let id = inner.interactions.len() as i64 + 1;
        if i.followed {
            upsert_followed(&mut inner.followed, &i.username, &i.source, i.at);
        }
        inner.interactions.push(InteractionRecord {
            id,
            session_id: i.session_id.to_string(),
            username: i.username,
            source: i.source,
            succeeded: i.succeeded,
            followed: i.followed,
            interacted_at: i.at,
        });
        Ok(())
    }

    async fn was_interacted(&self, username: &str) -> Result<bool, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.interactions.iter().any(|i| i.username == username))
    }

    async fn followed_candidates(&self, limit: i64) -> Result<Vec<FollowedUser>, StoreError> {
        let inner = self.inner.lock().await;
        let mut candidates: Vec<FollowedUser> = inner
            .followed
            .iter()
            .filter(|f| f.unfollowed_at.is_none())
            .cloned()
            .collect();
        candidates.sort_by(|a, b| {
            a.followed_at
                .cmp(&b.followed_at)
                .then_with(|| a.username.cmp(&b.username))
        });
        candidates.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(candidates)
    }

    async fn mark_unfollowed(&self, username: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if let Some(f) = inner
            .followed
            .iter_mut()
            .find(|f| f.username == username && f.unfollowed_at.is_none())
        {
            f.unfollowed_at = Some(at);
        }
        Ok(())
    }

    async fn save_session(&self, session: &SessionState) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.sessions.insert(session.id(), session.clone());
        Ok(())
    }

    async fn list_sessions(&self, limit: i64) -> Result<Vec<SessionState>, StoreError> {
        let inner = self.inner.lock().await;
        let mut sessions: Vec<SessionState> = inner.sessions.values().cloned().collect();
        sessions.sort_by_key(|s| s.start_time());
        let keep = usize::try_from(limit).unwrap_or(0);
        let skip = sessions.len().saturating_sub(keep);
        Ok(sessions.split_off(skip))
    }

    async fn append_event(&self, event: NewEvent) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let id = inner.events.len() as i64 + 1;
        inner.events.push(StoredEvent {
            id,
            session_id: event.session_id,
            ts: Utc::now(),
            event_type: event.r#type,
            payload: event.payload,
        });
        Ok(())
    }
}
