//! Models for the server-side session record backing each issued token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
/// One record per issued token. The token string is unique; the soft expiry
/// (`expires_at`) is the only mutable clock, distinct from the token's own
/// embedded expiry.
pub struct Session {
    pub id: String,
    /// Raw signed token string, immutable after creation.
    pub token: String,
    /// Owning user; many sessions may reference one user.
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    /// Bumped on every accepted request. Advisory telemetry only.
    pub last_used_at: DateTime<Utc>,
    /// Soft/idle expiry. Extended or shortened by the timeout update, forced
    /// to "now" by logout, and never pushed forward by ordinary requests.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Human-readable session age returned by the read endpoint.
pub struct SessionAgeResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// New idle window in minutes, counted from now. Must be positive and
/// bounded; the HTTP edge rejects anything else before the lifecycle
/// service runs (`validation::rules::validate_timeout_minutes`).
pub struct UpdateTimeoutRequest {
    pub minutes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_in: Duration) -> Session {
        let now = Utc::now();
        Session {
            id: "s-1".into(),
            token: "tok".into(),
            user_id: "u-1".into(),
            created_at: now,
            last_used_at: now,
            expires_at: now + expires_in,
        }
    }

    #[test]
    fn expiry_check_uses_soft_expiry_only() {
        let now = Utc::now();
        assert!(!session(Duration::minutes(30)).is_expired(now));
        assert!(session(Duration::minutes(-1)).is_expired(now));
    }
}
