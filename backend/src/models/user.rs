//! Models that represent user accounts and the payloads that manage them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
/// Database representation of a user account.
pub struct User {
    /// Unique identifier for the user.
    pub id: String,
    /// Email address; doubles as the login identifier and token subject.
    pub email: String,
    /// Argon2 hash of the user's password.
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    /// Inactive accounts cannot log in. Accounts start inactive until the
    /// activation link is followed.
    pub active: bool,
    /// SHA-256 digest of the outstanding activation token, if any.
    pub activation_token_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Constructs a new, not-yet-activated user with fresh identifiers.
    pub fn new(
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            first_name,
            last_name,
            active: false,
            activation_token_hash: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
/// Payload for creating a new user account.
pub struct CreateUser {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
/// Payload for updating portions of an existing user.
pub struct UpdateUser {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Credentials submitted by a user attempting to authenticate.
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Bearer token and session window returned after a successful login.
pub struct LoginResponse {
    pub token: String,
    /// Soft (idle) expiry of the session record, not the token's own expiry.
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Public-facing representation of a user returned by the API.
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            active: user.active,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_users_start_inactive() {
        let user = User::new(
            "a@example.com".into(),
            "hash".into(),
            "Ada".into(),
            "Lovelace".into(),
        );
        assert!(!user.active);
        assert!(user.activation_token_hash.is_none());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn user_response_omits_password_hash() {
        let user = User::new(
            "a@example.com".into(),
            "hash".into(),
            "Ada".into(),
            "Lovelace".into(),
        );
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "a@example.com");
    }

    #[test]
    fn create_user_validates_email_and_password_length() {
        let bad = CreateUser {
            email: "not-an-email".into(),
            password: "short".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
        };
        assert!(validator::Validate::validate(&bad).is_err());

        let good = CreateUser {
            email: "a@example.com".into(),
            password: "long-enough-password".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
        };
        assert!(validator::Validate::validate(&good).is_ok());
    }
}
