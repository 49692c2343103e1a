//! Storage operations for session records. All policy (who may mutate what,
//! and when) lives in the validation gate and the lifecycle service; this
//! module is storage semantics only.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::session::Session;

pub async fn create_session(
    pool: &PgPool,
    token: &str,
    user_id: &str,
    idle_minutes: i64,
) -> Result<Session, sqlx::Error> {
    let now = Utc::now();
    let expires_at = now + Duration::minutes(idle_minutes);

    sqlx::query_as::<_, Session>(
        r#"
        INSERT INTO sessions (id, token, user_id, created_at, last_used_at, expires_at)
        VALUES ($1, $2, $3, $4, $4, $5)
        RETURNING id, token, user_id, created_at, last_used_at, expires_at
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(token)
    .bind(user_id)
    .bind(now)
    .bind(expires_at)
    .fetch_one(pool)
    .await
}

pub async fn find_session_by_token(
    pool: &PgPool,
    token: &str,
) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        r#"
        SELECT id, token, user_id, created_at, last_used_at, expires_at
        FROM sessions
        WHERE token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await
}

/// Bumps `last_used_at` only. Returns false when the record is gone, which
/// callers racing the sweeper must tolerate.
pub async fn touch_last_used(
    pool: &PgPool,
    token: &str,
    last_used_at: DateTime<Utc>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE sessions SET last_used_at = $1 WHERE token = $2")
        .bind(last_used_at)
        .bind(token)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Moves the soft expiry: forward for a timeout extension, to "now" for a
/// revocation. Never touches the token's own embedded expiry.
pub async fn set_expires_at(
    pool: &PgPool,
    token: &str,
    expires_at: DateTime<Utc>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE sessions SET expires_at = $1 WHERE token = $2")
        .bind(expires_at)
        .bind(token)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Single bounded bulk delete so the sweep never holds locks per record.
pub async fn delete_expired_before(
    pool: &PgPool,
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at < $1")
        .bind(now)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
