//! Models for single-use password-reset tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
/// A pending password reset. Only the SHA-256 digest of the emailed token is
/// stored; the record is single-use and expires one hour after creation.
pub struct PasswordReset {
    pub id: String,
    pub user_id: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
/// Payload asking for a reset link to be mailed.
pub struct PasswordResetRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
/// Replacement password submitted with the reset link.
pub struct PasswordResetConfirm {
    #[validate(length(min = 8))]
    pub new_password: String,
}
