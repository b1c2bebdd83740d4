use chrono::Utc;
use nightowl_core::SessionState;
use sqlx::SqlitePool;

use crate::store::StoreError;

pub async fn save_session(pool: &SqlitePool, session: &SessionState) -> Result<(), StoreError> {
    let snapshot = serde_json::to_string(session)?;
    sqlx::query(
        r#"
INSERT INTO sessions (id, start_time, finish_time, username, snapshot, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
ON CONFLICT (id) DO UPDATE
SET finish_time = excluded.finish_time, username = excluded.username,
    snapshot = excluded.snapshot, updated_at = excluded.updated_at
        "#,
    )
    .bind(session.id().to_string())
    .bind(session.start_time())
    .bind(session.finish_time())
    .bind(session.my_username().map(|u| u.as_str().to_string()))
    .bind(snapshot)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list_sessions(pool: &SqlitePool, limit: i64) -> Result<Vec<SessionState>, StoreError> {
    let rows: Vec<String> = sqlx::query_scalar(
        r#"SELECT snapshot FROM sessions ORDER BY start_time DESC, id LIMIT ?1"#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let mut sessions = rows
        .iter()
        .map(|raw| serde_json::from_str::<SessionState>(raw))
        .collect::<Result<Vec<_>, _>>()?;
    sessions.reverse();
    Ok(sessions)
}
