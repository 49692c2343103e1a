//! Password-reset and account-activation links. Both ride the exempt
//! `/{token}/{email}/{carrier}` templates: `token` is a single-use random
//! secret stored as a digest, `carrier` is a codec-issued token binding the
//! link to the email it was sent to.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::password_reset::{PasswordResetConfirm, PasswordResetRequest},
    repositories::{password_reset as password_reset_repo, user as user_repo},
    state::AppState,
    utils::{jwt, password::hash_password},
};

const RESET_REQUESTED_MESSAGE: &str = "If the account exists, a reset link has been sent";

/// Always answers with the same message so callers cannot probe which
/// emails have accounts.
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    let Some(user) = user_repo::find_user_by_email(&state.pool, &payload.email).await? else {
        tracing::info!(email = %payload.email, "Password reset requested for unknown email");
        return Ok(Json(json!({"message": RESET_REQUESTED_MESSAGE})));
    };

    let reset_token = Uuid::new_v4().to_string();
    password_reset_repo::create_password_reset(&state.pool, &user.id, &reset_token).await?;

    let carrier = jwt::issue_token(
        user.email.clone(),
        &state.signing_key,
        state.config.token_expiration_hours,
    )?;
    let link = format!(
        "/api/auth/password-reset/{}/{}/{}",
        reset_token, user.email, carrier
    );
    if let Err(err) = state
        .mailer
        .send(&user.email, "Reset your password", &link)
        .await
    {
        tracing::warn!(user_id = %user.id, error = ?err, "Failed to dispatch reset mail");
    }

    Ok(Json(json!({"message": RESET_REQUESTED_MESSAGE})))
}

pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Path((token, email, carrier)): Path<(String, String, String)>,
    Json(payload): Json<PasswordResetConfirm>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;
    verify_carrier(&state, &carrier, &email)?;

    let reset = password_reset_repo::find_valid_reset_by_token(&state.pool, &token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired reset link".into()))?;

    let user = user_repo::find_user_by_id(&state.pool, &reset.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired reset link".into()))?;
    if user.email != email {
        return Err(AppError::Unauthorized("Invalid or expired reset link".into()));
    }

    let password_hash = hash_password(&payload.new_password)?;
    user_repo::update_password_hash(&state.pool, &user.id, &password_hash).await?;
    password_reset_repo::mark_token_as_used(&state.pool, &reset.id).await?;

    tracing::info!(user_id = %user.id, "Password reset completed");
    Ok(Json(json!({"message": "Password updated"})))
}

pub async fn activate_account(
    State(state): State<AppState>,
    Path((token, email, carrier)): Path<(String, String, String)>,
) -> Result<Json<Value>, AppError> {
    verify_carrier(&state, &carrier, &email)?;

    let user = user_repo::find_user_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired activation link".into()))?;

    let digest = password_reset_repo::digest_token(&token);
    let activated = user_repo::activate_user(&state.pool, &user.id, &digest).await?;
    if !activated {
        return Err(AppError::Unauthorized(
            "Invalid or expired activation link".into(),
        ));
    }

    tracing::info!(user_id = %user.id, "Account activated");
    Ok(Json(json!({"message": "Account activated"})))
}

fn verify_carrier(state: &AppState, carrier: &str, email: &str) -> Result<(), AppError> {
    let claims = jwt::decode_token(carrier, &state.signing_key)
        .map_err(|_| AppError::Unauthorized("Invalid or expired link".into()))?;
    if claims.sub != email {
        return Err(AppError::Unauthorized("Invalid or expired link".into()));
    }
    Ok(())
}
