use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    middleware::auth::SessionToken,
    models::session::{SessionAgeResponse, UpdateTimeoutRequest},
    services::session as session_service,
    state::AppState,
    validation::rules,
};

pub async fn get_session_age(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
) -> Result<Json<SessionAgeResponse>, AppError> {
    let age = session_service::session_age(&state, &token.0).await?;
    Ok(Json(SessionAgeResponse {
        message: session_service::format_session_age(age),
    }))
}

pub async fn update_session_timeout(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    Json(payload): Json<UpdateTimeoutRequest>,
) -> Result<Json<Value>, AppError> {
    rules::validate_timeout_minutes(payload.minutes)
        .map_err(|e| AppError::Validation(vec![format!("minutes: {}", e.code)]))?;

    let expires_at =
        session_service::update_timeout(&state, &token.0, payload.minutes).await?;
    Ok(Json(json!({
        "message": "Session timeout updated",
        "expires_at": expires_at
    })))
}
