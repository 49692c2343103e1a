#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::models::{
    password_reset::{PasswordResetConfirm, PasswordResetRequest},
    session::{SessionAgeResponse, UpdateTimeoutRequest},
    user::{CreateUser, LoginRequest, LoginResponse, UpdateUser, UserResponse},
};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        login_doc,
        logout_doc,
        session_age_doc,
        session_timeout_doc,
        list_users_doc,
        get_user_doc,
        create_user_doc,
        update_user_doc,
        delete_user_doc,
        password_reset_request_doc,
        password_reset_confirm_doc,
        activate_account_doc
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            UserResponse,
            CreateUser,
            UpdateUser,
            SessionAgeResponse,
            UpdateTimeoutRequest,
            PasswordResetRequest,
            PasswordResetConfirm
        )
    ),
    modifiers(&SecuritySchemes),
    tags(
        (name = "Auth", description = "Login, logout and session lifecycle"),
        (name = "Users", description = "User administration")
    ),
    security(("BearerAuth" = []))
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_string());

        components.add_security_scheme("BearerAuth", SecurityScheme::Http(bearer));
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued and session created", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth",
    security(())
)]
fn login_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Session revoked", body = serde_json::Value)),
    tag = "Auth"
)]
fn logout_doc() {}

#[utoipa::path(
    get,
    path = "/api/auth/session/age",
    responses((status = 200, description = "Elapsed minutes since session creation", body = SessionAgeResponse)),
    tag = "Auth"
)]
fn session_age_doc() {}

#[utoipa::path(
    put,
    path = "/api/auth/session/timeout",
    request_body = UpdateTimeoutRequest,
    responses(
        (status = 200, description = "Soft expiry moved", body = serde_json::Value),
        (status = 400, description = "Minutes must be positive")
    ),
    tag = "Auth"
)]
fn session_timeout_doc() {}

#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, body = [UserResponse])),
    tag = "Users"
)]
fn list_users_doc() {}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses((status = 200, body = UserResponse), (status = 404, description = "Unknown user")),
    tag = "Users"
)]
fn get_user_doc() {}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUser,
    responses(
        (status = 200, description = "Inactive account created, activation link dispatched", body = UserResponse),
        (status = 409, description = "Email already registered")
    ),
    tag = "Users"
)]
fn create_user_doc() {}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUser,
    responses((status = 200, body = UserResponse)),
    tag = "Users"
)]
fn update_user_doc() {}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses((status = 200, body = serde_json::Value)),
    tag = "Users"
)]
fn delete_user_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/password-reset",
    request_body = PasswordResetRequest,
    responses((status = 200, description = "Same answer whether or not the account exists", body = serde_json::Value)),
    tag = "Auth",
    security(())
)]
fn password_reset_request_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/password-reset/{token}/{email}/{carrier}",
    params(
        ("token" = String, Path, description = "Single-use reset token"),
        ("email" = String, Path, description = "Account email"),
        ("carrier" = String, Path, description = "Signed carrier token from the link")
    ),
    request_body = PasswordResetConfirm,
    responses((status = 200, body = serde_json::Value), (status = 401, description = "Invalid or expired link")),
    tag = "Auth",
    security(())
)]
fn password_reset_confirm_doc() {}

#[utoipa::path(
    get,
    path = "/api/auth/activate/{token}/{email}/{carrier}",
    params(
        ("token" = String, Path, description = "Single-use activation token"),
        ("email" = String, Path, description = "Account email"),
        ("carrier" = String, Path, description = "Signed carrier token from the link")
    ),
    responses((status = 200, body = serde_json::Value), (status = 401, description = "Invalid or expired link")),
    tag = "Auth",
    security(())
)]
fn activate_account_doc() {}
