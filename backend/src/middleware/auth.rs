//! Validation gate: runs once per inbound request, ahead of every protected
//! handler.
//!
//! A request must satisfy two independent clocks: the token's embedded
//! expiry (checked by the codec) and the session record's soft expiry
//! (checked here). Accepted requests bump `last_used_at` but deliberately do
//! not push `expires_at` forward; idle sessions expire on schedule unless
//! the timeout-update endpoint is called.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::{
    error::{AppError, AuthError},
    models::user::User,
    repositories::{session as session_repo, user as user_repo},
    state::AppState,
    utils::jwt::{self, Claims},
};

/// Raw token string the request authenticated with, bound into request
/// extensions so logout and the session endpoints can reach their record.
#[derive(Clone, Debug)]
pub struct SessionToken(pub String);

pub async fn auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Exempt templates carry their own single-use credentials (or none, for
    // login) and pass through unauthenticated.
    if is_exempt_path(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    // An already-bound identity means the gate ran for this request; never
    // evaluate the token twice.
    if request.extensions().get::<User>().is_some() {
        return Ok(next.run(request).await);
    }

    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingOrMalformedHeader)?;
    let token = parse_bearer_token(header_value)
        .ok_or(AuthError::MissingOrMalformedHeader)?
        .to_string();

    let (claims, user) = authenticate_token(&state, &token).await?;

    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(user);
    request.extensions_mut().insert(SessionToken(token));

    Ok(next.run(request).await)
}

async fn authenticate_token(state: &AppState, token: &str) -> Result<(Claims, User), AuthError> {
    let claims = jwt::decode_token(token, &state.signing_key).map_err(AuthError::from)?;

    let session = session_repo::find_session_by_token(&state.pool, token)
        .await?
        .ok_or(AuthError::SessionNotFound)?;

    let now = Utc::now();
    if session.is_expired(now) {
        return Err(AuthError::SessionExpired);
    }

    // A decodable token whose session points at a missing user is the same
    // integrity anomaly as a missing session record.
    let user = user_repo::find_user_by_id(&state.pool, &session.user_id)
        .await?
        .ok_or(AuthError::SessionNotFound)?;

    // The sweeper may delete the record between the expiry check above and
    // this write; the request proceeds on its bound identity and the next
    // request is rejected normally.
    if !session_repo::touch_last_used(&state.pool, token, now).await? {
        tracing::debug!(user_id = %session.user_id, "Session swept mid-request; identity stays bound for this request");
    }

    Ok((claims, user))
}

pub fn parse_bearer_token(header: &str) -> Option<&str> {
    if let Some(rest) = header.strip_prefix("Bearer ") {
        let rest = rest.trim_start();
        if !rest.is_empty() {
            return Some(rest);
        }
        return None;
    }
    if let Some(space_idx) = header.find(' ') {
        let (scheme, rest) = header.split_at(space_idx);
        if scheme.eq_ignore_ascii_case("bearer") {
            let rest = rest.trim_start();
            if !rest.is_empty() {
                return Some(rest);
            }
        }
    }
    None
}

/// Fixed set of templates the gate passes through unauthenticated: login,
/// the password-reset request endpoint, the reset/activation link templates
/// (`.../{token}/{email}/{carrier}`) and the API docs.
pub fn is_exempt_path(path: &str) -> bool {
    if path == "/api/auth/login" || path == "/api/auth/password-reset" {
        return true;
    }
    if path == "/api/docs"
        || path.starts_with("/api/docs/")
        || path == "/api-doc/openapi.json"
    {
        return true;
    }
    matches_link_template(path, "/api/auth/password-reset")
        || matches_link_template(path, "/api/auth/activate")
}

fn matches_link_template(path: &str, prefix: &str) -> bool {
    let Some(rest) = path.strip_prefix(prefix) else {
        return false;
    };
    let Some(rest) = rest.strip_prefix('/') else {
        return false;
    };
    let mut segments = rest.split('/');
    let filled = |segment: Option<&str>| segment.is_some_and(|s| !s.is_empty());
    filled(segments.next())
        && filled(segments.next())
        && filled(segments.next())
        && segments.next().is_none()
}
