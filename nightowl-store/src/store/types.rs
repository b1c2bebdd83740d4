use chrono::{DateTime, Utc};
use nightowl_core::{InteractionOutcome, Target};
use serde_json::Value as JsonValue;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewInteraction {
    pub session_id: Uuid,
    pub username: String,
    /// Counter key of the source, e.g. `@alice` or `#cats`.
    pub source: String,
    pub succeeded: bool,
    pub followed: bool,
    pub at: DateTime<Utc>,
}

impl NewInteraction {
    pub fn from_outcome(
        session_id: Uuid,
        target: &Target,
        outcome: &InteractionOutcome,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            username: target.username.clone(),
            source: target.source.key(),
            succeeded: outcome.succeeded,
            followed: outcome.followed,
            at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct InteractionRecord {
    pub id: i64,
    pub session_id: String,
    pub username: String,
    pub source: String,
    pub succeeded: bool,
    pub followed: bool,
    pub interacted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct FollowedUser {
    pub username: String,
    pub source: String,
    pub followed_at: DateTime<Utc>,
    pub unfollowed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub session_id: Option<Uuid>,
    pub r#type: String,
    pub payload: JsonValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredEvent {
    pub id: i64,
    pub session_id: Option<Uuid>,
    pub ts: DateTime<Utc>,
    pub event_type: String,
    pub payload: JsonValue,
}
