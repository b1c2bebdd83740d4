use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nightowl_core::SessionState;

use crate::store::types::*;

#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Append one interaction attempt. A followed target also enters the
    /// followed-user ledger used by unfollow runs.
    async fn record_interaction(&self, interaction: NewInteraction) -> Result<(), StoreError>;

    async fn was_interacted(&self, username: &str) -> Result<bool, StoreError>;

    /// Accounts followed by nightowl and not yet unfollowed, oldest first.
    async fn followed_candidates(&self, limit: i64) -> Result<Vec<FollowedUser>, StoreError>;

    /// Take `username` out of the candidate pool. Calling it twice is a no-op.
    async fn mark_unfollowed(&self, username: &str, at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Insert or replace the snapshot of a session.
    async fn save_session(&self, session: &SessionState) -> Result<(), StoreError>;

    /// The most recent `limit` sessions, in chronological order.
    async fn list_sessions(&self, limit: i64) -> Result<Vec<SessionState>, StoreError>;

    async fn append_event(&self, event: NewEvent) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store error: {0}")]
    Other(String),
    #[error("corrupt session snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Other(e.to_string())
    }
}
