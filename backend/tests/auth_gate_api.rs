//! Validation-gate behavior that runs before any storage access: exempt
//! templates, header parsing and the three token decode failures each get
//! their own response code.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware as axum_middleware,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use userdesk_backend::{
    middleware::auth,
    state::AppState,
    utils::jwt::{issue_token, Claims},
    utils::signing_key::SigningKey,
};

mod support;

async fn ok_handler() -> Json<Value> {
    Json(json!({"ok": true}))
}

fn gated_router(state: AppState) -> Router {
    Router::new()
        .route("/api/users", get(ok_handler))
        .route(
            "/api/auth/password-reset/{token}/{email}/{carrier}",
            get(ok_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::auth,
        ))
        .with_state(state)
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn exempt_reset_template_passes_without_header() {
    let app = gated_router(support::test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/password-reset/tok123/user%40example.com/carrier456")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_path_without_header_is_rejected() {
    let app = gated_router(support::test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/users")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = response_json(response).await;
    assert_eq!(json["code"], "AUTH_HEADER");
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected_as_header_error() {
    let app = gated_router(support::test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/users")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwdw==")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = response_json(response).await;
    assert_eq!(json["code"], "AUTH_HEADER");
}

#[tokio::test]
async fn garbage_token_is_reported_as_malformed() {
    let app = gated_router(support::test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/users")
                .header(header::AUTHORIZATION, "Bearer not-a-token")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = response_json(response).await;
    assert_eq!(json["code"], "TOKEN_MALFORMED");
}

#[tokio::test]
async fn token_from_foreign_key_is_reported_as_bad_signature() {
    let state = support::test_state();
    let foreign = SigningKey::init(None).expect("foreign key");
    let token = issue_token("user@example.com".into(), &foreign, 1).expect("issue");

    let app = gated_router(state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/users")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = response_json(response).await;
    assert_eq!(json["code"], "TOKEN_BAD_SIGNATURE");
}

#[tokio::test]
async fn cryptographically_expired_token_is_reported_as_token_expired() {
    let state = support::test_state();
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: "user@example.com".into(),
        exp: now - 3600,
        iat: now - 7200,
        jti: "expired-gate-test".into(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.signing_key.as_bytes()),
    )
    .expect("encode");

    let app = gated_router(state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/users")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = response_json(response).await;
    assert_eq!(json["code"], "TOKEN_EXPIRED");
}
