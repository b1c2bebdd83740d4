use sqlx::SqlitePool;

use crate::store::StoreError;

const SCHEMA: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS interactions (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id    TEXT NOT NULL,
    username      TEXT NOT NULL,
    source        TEXT NOT NULL,
    succeeded     BOOLEAN NOT NULL,
    followed      BOOLEAN NOT NULL,
    interacted_at TEXT NOT NULL
)"#,
    r#"CREATE INDEX IF NOT EXISTS interactions_username_idx ON interactions (username)"#,
    r#"
CREATE TABLE IF NOT EXISTS followed_users (
    username      TEXT PRIMARY KEY,
    source        TEXT NOT NULL,
    followed_at   TEXT NOT NULL,
    unfollowed_at TEXT
)"#,
    r#"
CREATE TABLE IF NOT EXISTS sessions (
    id          TEXT PRIMARY KEY,
    start_time  TEXT NOT NULL,
    finish_time TEXT,
    username    TEXT,
    snapshot    TEXT NOT NULL,
    updated_at  TEXT NOT NULL
)"#,
    r#"
CREATE TABLE IF NOT EXISTS session_events (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT,
    ts         TEXT NOT NULL,
    type       TEXT NOT NULL,
    payload    TEXT NOT NULL
)"#,
];

/// Create every table the store needs. Safe to run repeatedly.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StoreError> {
    let mut tx = pool.begin().await?;
    for stmt in SCHEMA {
        sqlx::query(stmt).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
}
