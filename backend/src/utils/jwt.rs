//! Token codec: mints and verifies the signed bearer token.
//!
//! The embedded expiry is fixed at issuance and can never be extended; the
//! adjustable idle expiry lives on the session record, not here. Both pure
//! functions of their input and the process signing key.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::utils::signing_key::SigningKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the owning user's email.
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl Claims {
    pub fn new(subject: String, expiration_hours: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours as i64);

        Self {
            sub: subject,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// Decode failures, kept apart because the validation gate reports a
/// different message for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token cannot be parsed")]
    Malformed,
    #[error("token signature does not verify")]
    BadSignature,
    #[error("token expiry has passed")]
    Expired,
}

pub fn issue_token(
    subject: String,
    key: &SigningKey,
    expiration_hours: u64,
) -> anyhow::Result<String> {
    let claims = Claims::new(subject, expiration_hours);
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(key.as_bytes()),
    )?;

    Ok(token)
}

pub fn decode_token(token: &str, key: &SigningKey) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    // No leeway: the embedded expiry is exact.
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(key.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|err| match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::BadSignature,
        _ => TokenError::Malformed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_then_decode_round_trips_subject_and_window() {
        let key = SigningKey::init(None).expect("init key");
        let token = issue_token("user@example.com".into(), &key, 10).expect("issue");
        let claims = decode_token(&token, &key).expect("decode");

        assert_eq!(claims.sub, "user@example.com");
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp - claims.iat, 10 * 3600);
    }

    #[test]
    fn decode_rejects_token_signed_with_another_key() {
        let key = SigningKey::init(None).expect("init key");
        let other = SigningKey::init(None).expect("init other key");
        let token = issue_token("user@example.com".into(), &key, 1).expect("issue");

        assert_eq!(decode_token(&token, &other), Err(TokenError::BadSignature));
    }

    #[test]
    fn decode_rejects_garbage_as_malformed() {
        let key = SigningKey::init(None).expect("init key");
        assert_eq!(
            decode_token("not-a-token", &key),
            Err(TokenError::Malformed)
        );
    }
}
