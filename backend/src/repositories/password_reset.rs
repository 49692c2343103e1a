//! Storage for single-use password-reset tokens. Only digests are stored;
//! the raw token exists solely inside the emailed link.

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::password_reset::PasswordReset;

const RESET_COLUMNS: &str = "id, user_id, token_hash, expires_at, created_at, used_at";

pub async fn create_password_reset(
    pool: &PgPool,
    user_id: &str,
    token: &str,
) -> Result<PasswordReset, sqlx::Error> {
    let expires_at = reset_expiry(Utc::now());

    sqlx::query_as::<_, PasswordReset>(&format!(
        "INSERT INTO password_resets (id, user_id, token_hash, expires_at) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {RESET_COLUMNS}"
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(digest_token(token))
    .bind(expires_at)
    .fetch_one(pool)
    .await
}

/// Looks the token up by digest; expired or already-used records never match.
pub async fn find_valid_reset_by_token(
    pool: &PgPool,
    token: &str,
) -> Result<Option<PasswordReset>, sqlx::Error> {
    sqlx::query_as::<_, PasswordReset>(&format!(
        "SELECT {RESET_COLUMNS} FROM password_resets \
         WHERE token_hash = $1 AND expires_at > $2 AND used_at IS NULL"
    ))
    .bind(digest_token(token))
    .bind(Utc::now())
    .fetch_optional(pool)
    .await
}

pub async fn mark_token_as_used(pool: &PgPool, reset_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE password_resets SET used_at = $1 WHERE id = $2")
        .bind(Utc::now())
        .bind(reset_id)
        .execute(pool)
        .await
        .map(|_| ())
}

pub async fn delete_expired_tokens(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM password_resets WHERE expires_at < $1")
        .bind(Utc::now())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

fn reset_expiry(from: DateTime<Utc>) -> DateTime<Utc> {
    from + Duration::hours(1)
}

/// SHA-256 hex digest shared by the reset and activation one-time tokens.
pub fn digest_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_and_hex_encoded() {
        let a = digest_token("one-time-token");
        let b = digest_token("one-time-token");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, digest_token("other-token"));
    }

    #[test]
    fn reset_window_is_one_hour() {
        let now = Utc::now();
        assert_eq!(reset_expiry(now) - now, Duration::hours(1));
    }
}
