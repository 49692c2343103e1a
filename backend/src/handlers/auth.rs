use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    models::user::{LoginRequest, LoginResponse},
    services::session as session_service,
    state::AppState,
};

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = session_service::login(&state, &payload).await?;
    Ok(Json(response))
}

/// Revokes the presented session. The gate has already validated the token;
/// the service re-parses the header so an unknown token is still an error
/// rather than a silent no-op.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    session_service::logout(&state, auth_header).await?;
    Ok(Json(json!({"message": "Logged out"})))
}
