use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::store::{NewEvent, StoreError, StoredEvent};

pub async fn append_event(pool: &SqlitePool, event: NewEvent) -> Result<(), StoreError> {
    sqlx::query(
        r#"INSERT INTO session_events (session_id, ts, type, payload) VALUES (?1, ?2, ?3, ?4)"#,
    )
    .bind(event.session_id.map(|id| id.to_string()))
    .bind(Utc::now())
    .bind(event.r#type)
    .bind(event.payload.to_string())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_events_after(
    pool: &SqlitePool,
    after_id: i64,
    limit: i64,
) -> Result<Vec<StoredEvent>, StoreError> {
    let rows = sqlx::query(
        r#"
SELECT id, session_id, ts, type, payload
FROM session_events WHERE id > ?1 ORDER BY id LIMIT ?2
        "#,
    )
    .bind(after_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| -> Result<StoredEvent, StoreError> {
            let session_id: Option<String> = row.try_get("session_id")?;
            let payload: String = row.try_get("payload")?;
            let ts: DateTime<Utc> = row.try_get("ts")?;
            Ok(StoredEvent {
                id: row.try_get("id")?,
                session_id: session_id
                    .as_deref()
                    .map(Uuid::parse_str)
                    .transpose()
                    .map_err(|e| StoreError::Other(e.to_string()))?,
                ts,
                event_type: row.try_get("type")?,
                payload: serde_json::from_str(&payload)?,
            })
        })
        .collect()
}
