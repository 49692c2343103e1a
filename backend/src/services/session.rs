//! Session lifecycle: issue on login, revoke on logout, report age, move
//! the idle window. All storage access goes through the session repository.

use chrono::{DateTime, Duration, Utc};

use crate::{
    error::{AppError, AuthError},
    middleware::auth::parse_bearer_token,
    models::{
        session::Session,
        user::{LoginRequest, LoginResponse},
    },
    repositories::{session as session_repo, user as user_repo},
    state::AppState,
    utils::{jwt, password::verify_password},
};

/// Verifies credentials, mints a signed token and persists the session
/// record. Unknown email, wrong password and inactive account all surface
/// the same opaque error so callers cannot probe account state; the log
/// line tells them apart.
pub async fn login(state: &AppState, payload: &LoginRequest) -> Result<LoginResponse, AppError> {
    let user = user_repo::find_user_by_email(&state.pool, &payload.email)
        .await
        .map_err(AuthError::Persistence)?;

    let Some(user) = user else {
        tracing::warn!(email = %payload.email, "Login rejected: unknown email");
        return Err(AuthError::InvalidCredentials.into());
    };

    let matches = verify_password(&payload.password, &user.password_hash)
        .map_err(AppError::InternalServerError)?;
    if !matches {
        tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    if !user.active {
        tracing::warn!(user_id = %user.id, "Login rejected: account not activated");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = jwt::issue_token(
        user.email.clone(),
        &state.signing_key,
        state.config.token_expiration_hours,
    )?;

    let session = session_repo::create_session(
        &state.pool,
        &token,
        &user.id,
        state.config.session_idle_minutes,
    )
    .await
    .map_err(AuthError::Persistence)?;

    tracing::info!(user_id = %user.id, expires_at = %session.expires_at, "Session issued");

    Ok(LoginResponse {
        token,
        expires_at: session.expires_at,
        user: user.into(),
    })
}

/// Revokes the session named by the Authorization header: its soft expiry is
/// forced to "now". The record must exist (an unknown token is an error);
/// revoking an already-expired session is a harmless no-op.
pub async fn logout(state: &AppState, authorization_header: Option<&str>) -> Result<(), AppError> {
    let header = authorization_header.ok_or(AuthError::MissingOrMalformedHeader)?;
    let token = parse_bearer_token(header).ok_or(AuthError::MissingOrMalformedHeader)?;

    let session = find_session(state, token).await?;

    session_repo::set_expires_at(&state.pool, &session.token, Utc::now())
        .await
        .map_err(AuthError::Persistence)?;

    tracing::info!(user_id = %session.user_id, "Session revoked");
    Ok(())
}

/// Elapsed time since the session record was created.
pub async fn session_age(state: &AppState, token: &str) -> Result<Duration, AppError> {
    let session = find_session(state, token).await?;
    Ok(Utc::now() - session.created_at)
}

/// Moves the soft expiry to `now + minutes`. Range checking of `minutes` is
/// the HTTP edge's responsibility; values that would overflow the timestamp
/// arithmetic are still rejected here rather than panicking.
pub async fn update_timeout(
    state: &AppState,
    token: &str,
    minutes: i64,
) -> Result<DateTime<Utc>, AppError> {
    let expires_at = Duration::try_minutes(minutes)
        .and_then(|window| Utc::now().checked_add_signed(window))
        .ok_or_else(|| {
            AppError::Validation(vec!["minutes: timeout_minutes_out_of_range".to_string()])
        })?;
    let updated = session_repo::set_expires_at(&state.pool, token, expires_at)
        .await
        .map_err(AuthError::Persistence)?;
    if !updated {
        return Err(AuthError::SessionNotFound.into());
    }
    Ok(expires_at)
}

async fn find_session(state: &AppState, token: &str) -> Result<Session, AppError> {
    session_repo::find_session_by_token(&state.pool, token)
        .await
        .map_err(AuthError::Persistence)?
        .ok_or_else(|| AuthError::SessionNotFound.into())
}

/// Formats a session age the way the read endpoint reports it.
pub fn format_session_age(age: Duration) -> String {
    let minutes = age.num_minutes().max(0);
    format!("Session created {} minute(s) ago", minutes)
}
