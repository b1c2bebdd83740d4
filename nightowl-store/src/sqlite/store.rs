use std::str::FromStr;

use chrono::{DateTime, Utc};
use nightowl_core::SessionState;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::store::{
    FollowedUser, InteractionRecord, InteractionStore, NewEvent, NewInteraction, StoreError,
    StoredEvent,
};

use super::events;
use super::interactions;
use super::schema;
use super::sessions;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url`.
    ///
    /// In-memory databases live as long as their connection, so they get a
    /// single connection that is never recycled.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let mut pool = SqlitePoolOptions::new().max_connections(max_connections);
        if database_url.contains(":memory:") {
            pool = pool
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = pool.connect_with(options).await?;
        Ok(Self { pool })
    }

    /// [`SqliteStore::connect`] followed by [`run_migrations`](super::run_migrations).
    pub async fn open(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let store = Self::connect(database_url, max_connections).await?;
        schema::run_migrations(&store.pool).await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn interactions(&self, limit: i64) -> Result<Vec<InteractionRecord>, StoreError> {
        interactions::list_interactions(&self.pool, limit).await
    }

    pub async fn events_after(
        &self,
        after_id: i64,
        limit: i64,
    ) -> Result<Vec<StoredEvent>, StoreError> {
        events::get_events_after(&self.pool, after_id, limit).await
    }
}

#[async_trait::async_trait]
impl InteractionStore for SqliteStore {
    async fn record_interaction(&self, interaction: NewInteraction) -> Result<(), StoreError> {
        interactions::record_interaction(&self.pool, interaction).await
    }

    async fn was_interacted(&self, username: &str) -> Result<bool, StoreError> {
        interactions::was_interacted(&self.pool, username).await
    }

    async fn followed_candidates(&self, limit: i64) -> Result<Vec<FollowedUser>, StoreError> {
        interactions::followed_candidates(&self.pool, limit).await
    }

    async fn mark_unfollowed(&self, username: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        interactions::mark_unfollowed(&self.pool, username, at).await
    }

    async fn save_session(&self, session: &SessionState) -> Result<(), StoreError> {
        sessions::save_session(&self.pool, session).await
    }

    async fn list_sessions(&self, limit: i64) -> Result<Vec<SessionState>, StoreError> {
        sessions::list_sessions(&self.pool, limit).await
    }

    async fn append_event(&self, event: NewEvent) -> Result<(), StoreError> {
        events::append_event(&self.pool, event).await
    }
}
