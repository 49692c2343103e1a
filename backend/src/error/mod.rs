use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Failures raised by the authentication and session-lifecycle core.
///
/// Each variant is reported to the caller with its own `code` so a client
/// can tell a missing header from a tampered token from an idle-expired
/// session. The messages never carry storage identifiers.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing or malformed Authorization header")]
    MissingOrMalformedHeader,
    #[error("Malformed token")]
    TokenMalformed,
    #[error("Token signature verification failed")]
    TokenBadSignature,
    #[error("Token expired")]
    TokenExpired,
    /// A decodable token with no matching session record. Data-integrity
    /// anomaly, fatal for the current request.
    #[error("No session found for token")]
    SessionNotFound,
    /// Idle/soft expiry has passed or the session was revoked.
    #[error("Session expired")]
    SessionExpired,
    /// Covers unknown email, wrong password and inactive account with one
    /// opaque message; the cases are logged distinctly at the call site.
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Storage failure")]
    Persistence(#[from] sqlx::Error),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingOrMalformedHeader => "AUTH_HEADER",
            AuthError::TokenMalformed => "TOKEN_MALFORMED",
            AuthError::TokenBadSignature => "TOKEN_BAD_SIGNATURE",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::SessionNotFound => "SESSION_NOT_FOUND",
            AuthError::SessionExpired => "SESSION_EXPIRED",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Persistence(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    Conflict(String),
    BadRequest(String),
    InternalServerError(anyhow::Error),
    Validation(Vec<String>),
    Auth(AuthError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, code, details) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND".to_string(), None),
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                msg,
                "UNAUTHORIZED".to_string(),
                None,
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, "CONFLICT".to_string(), None),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                msg,
                "BAD_REQUEST".to_string(),
                None,
            ),
            AppError::InternalServerError(err) => {
                tracing::error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    "INTERNAL_SERVER_ERROR".to_string(),
                    None,
                )
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                "VALIDATION_ERROR".to_string(),
                Some(serde_json::json!({ "errors": errors })),
            ),
            AppError::Auth(err) => {
                let status = err.status();
                if let AuthError::Persistence(ref source) = err {
                    tracing::error!(error = ?source, "Storage failure in auth core");
                    (
                        status,
                        "Internal server error".to_string(),
                        err.code().to_string(),
                        None,
                    )
                } else {
                    (status, err.to_string(), err.code().to_string(), None)
                }
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
            code,
            details,
        });

        (status, body).into_response()
    }
}

impl From<crate::utils::jwt::TokenError> for AuthError {
    fn from(err: crate::utils::jwt::TokenError) -> Self {
        use crate::utils::jwt::TokenError;
        match err {
            TokenError::Malformed => AuthError::TokenMalformed,
            TokenError::BadSignature => AuthError::TokenBadSignature,
            TokenError::Expired => AuthError::TokenExpired,
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalServerError(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            _ => AppError::InternalServerError(err.into()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let code = e.code.as_ref();
                    format!("{}: {}", field, code)
                })
            })
            .collect();
        AppError::Validation(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn response_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn app_error_into_response_maps_status_and_body() {
        let response = AppError::BadRequest("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "bad");
        assert_eq!(json["code"], "BAD_REQUEST");

        let response = AppError::NotFound("missing".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = response_json(response).await;
        assert_eq!(json["code"], "NOT_FOUND");

        let response = AppError::Conflict("conflict".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = response_json(response).await;
        assert_eq!(json["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn auth_errors_map_to_distinct_codes() {
        let cases = [
            (AuthError::MissingOrMalformedHeader, "AUTH_HEADER"),
            (AuthError::TokenMalformed, "TOKEN_MALFORMED"),
            (AuthError::TokenBadSignature, "TOKEN_BAD_SIGNATURE"),
            (AuthError::TokenExpired, "TOKEN_EXPIRED"),
            (AuthError::SessionNotFound, "SESSION_NOT_FOUND"),
            (AuthError::SessionExpired, "SESSION_EXPIRED"),
            (AuthError::InvalidCredentials, "INVALID_CREDENTIALS"),
        ];
        for (err, expected_code) in cases {
            let response = AppError::Auth(err).into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let json = response_json(response).await;
            assert_eq!(json["code"], expected_code);
        }
    }

    #[tokio::test]
    async fn persistence_failure_is_internal_and_opaque() {
        let err = AuthError::Persistence(sqlx::Error::PoolTimedOut);
        let response = AppError::Auth(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["error"], "Internal server error");
    }

    #[tokio::test]
    async fn app_error_validation_includes_details() {
        let response = AppError::Validation(vec!["minutes: range".to_string()]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["details"]["errors"][0], "minutes: range");
    }
}
