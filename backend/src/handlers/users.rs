use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{CreateUser, UpdateUser, User, UserResponse},
    repositories::{password_reset as password_reset_repo, user as user_repo},
    state::AppState,
    utils::{jwt, password::hash_password},
};

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = user_repo::list_users(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = user_repo::find_user_by_id(&state.pool, &user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(user.into()))
}

/// Creates an inactive account and dispatches an activation link through the
/// mailer seam. The account cannot log in until the link is followed.
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUser>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;

    if user_repo::find_user_by_email(&state.pool, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(&payload.password)?;
    let mut user = User::new(
        payload.email,
        password_hash,
        payload.first_name,
        payload.last_name,
    );

    let activation_token = Uuid::new_v4().to_string();
    user.activation_token_hash = Some(password_reset_repo::digest_token(&activation_token));

    user_repo::insert_user(&state.pool, &user).await?;

    send_activation_link(&state, &user, &activation_token).await;

    Ok(Json(user.into()))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateUser>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;

    let user = user_repo::update_user(&state.pool, &user_id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(user.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let deleted = user_repo::delete_user(&state.pool, &user_id).await?;
    if !deleted {
        return Err(AppError::NotFound("User not found".into()));
    }
    Ok(Json(json!({"message": "User deleted"})))
}

async fn send_activation_link(state: &AppState, user: &User, activation_token: &str) {
    let carrier = match jwt::issue_token(
        user.email.clone(),
        &state.signing_key,
        state.config.token_expiration_hours,
    ) {
        Ok(carrier) => carrier,
        Err(err) => {
            tracing::error!(user_id = %user.id, error = ?err, "Failed to mint activation carrier token");
            return;
        }
    };

    let link = format!(
        "/api/auth/activate/{}/{}/{}",
        activation_token, user.email, carrier
    );
    if let Err(err) = state
        .mailer
        .send(&user.email, "Activate your account", &link)
        .await
    {
        // Delivery is best effort; the admin can re-create the account.
        tracing::warn!(user_id = %user.id, error = ?err, "Failed to dispatch activation mail");
    }
}
