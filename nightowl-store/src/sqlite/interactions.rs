use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::store::{FollowedUser, InteractionRecord, NewInteraction, StoreError};

pub async fn record_interaction(pool: &SqlitePool, i: NewInteraction) -> Result<(), StoreError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
INSERT INTO interactions (session_id, username, source, succeeded, followed, interacted_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(i.session_id.to_string())
    .bind(&i.username)
    .bind(&i.source)
    .bind(i.succeeded)
    .bind(i.followed)
    .bind(i.at)
    .execute(&mut *tx)
    .await?;

    if i.followed {
        // A re-follow puts the account back into the candidate pool.
        sqlx::query(
            r#"
INSERT INTO followed_users (username, source, followed_at, unfollowed_at)
VALUES (?1, ?2, ?3, NULL)
ON CONFLICT (username) DO UPDATE
SET source = excluded.source, followed_at = excluded.followed_at, unfollowed_at = NULL
            "#,
        )
        .bind(&i.username)
        .bind(&i.source)
        .bind(i.at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn was_interacted(pool: &SqlitePool, username: &str) -> Result<bool, StoreError> {
    let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM interactions WHERE username = ?1"#)
        .bind(username)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn list_interactions(
    pool: &SqlitePool,
    limit: i64,
) -> Result<Vec<InteractionRecord>, StoreError> {
    let rows = sqlx::query_as::<_, InteractionRecord>(
        r#"
SELECT id, session_id, username, source, succeeded, followed, interacted_at
FROM interactions ORDER BY id LIMIT ?1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn followed_candidates(
    pool: &SqlitePool,
    limit: i64,
) -> Result<Vec<FollowedUser>, StoreError> {
    let rows = sqlx::query_as::<_, FollowedUser>(
        r#"
SELECT username, source, followed_at, unfollowed_at
FROM followed_users
WHERE unfollowed_at IS NULL
ORDER BY followed_at, username
LIMIT ?1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn mark_unfollowed(
    pool: &SqlitePool,
    username: &str,
    at: DateTime<Utc>,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"UPDATE followed_users SET unfollowed_at = ?2 WHERE username = ?1 AND unfollowed_at IS NULL"#,
    )
    .bind(username)
    .bind(at)
    .execute(pool)
    .await?;
    Ok(())
}
