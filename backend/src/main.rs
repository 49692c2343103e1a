use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::Method,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use userdesk_backend::{
    config::Config,
    db::connection::create_pool,
    docs::ApiDoc,
    handlers,
    middleware::{auth as auth_middleware, request_id},
    services::{cleanup::SessionCleanupTask, mailer::LogMailer},
    state::AppState,
    utils::signing_key::SigningKey,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "userdesk_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        database_url = %config.database_url,
        signing_key_file = ?config.signing_key_file,
        token_expiration_hours = config.token_expiration_hours,
        session_idle_minutes = config.session_idle_minutes,
        cleanup_interval_minutes = config.cleanup_interval_minutes,
        "Loaded configuration from environment/.env"
    );

    // Process-wide signing key: explicit init step, read-only afterwards.
    let signing_key = SigningKey::init(config.signing_key_file.as_deref())?;

    // Initialize database
    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let state = AppState::new(
        pool.clone(),
        config.clone(),
        signing_key,
        Arc::new(LogMailer),
    );

    // Public routes: the validation gate exempts these by template.
    let public_routes = Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route(
            "/api/auth/password-reset",
            post(handlers::password_reset::request_password_reset),
        )
        .route(
            "/api/auth/password-reset/{token}/{email}/{carrier}",
            post(handlers::password_reset::confirm_password_reset),
        )
        .route(
            "/api/auth/activate/{token}/{email}/{carrier}",
            get(handlers::password_reset::activate_account),
        );

    // Everything else sits behind the gate.
    let protected_routes = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route(
            "/api/auth/session/age",
            get(handlers::sessions::get_session_age),
        )
        .route(
            "/api/auth/session/timeout",
            put(handlers::sessions::update_session_timeout),
        )
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/api/users/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        );

    // One app-wide gate; path exemption is the gate's first step.
    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(SwaggerUi::new("/api/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(request_id::request_id))
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([
                            Method::GET,
                            Method::POST,
                            Method::PUT,
                            Method::DELETE,
                            Method::OPTIONS,
                        ])
                        .allow_headers(Any)
                        .max_age(Duration::from_secs(24 * 60 * 60)),
                )
                .layer(axum_middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware::auth,
                )),
        )
        .with_state(state);

    // Background sweep, owned here so shutdown is deterministic.
    let cleanup = SessionCleanupTask::spawn(
        pool,
        Duration::from_secs(config.cleanup_interval_minutes * 60),
    );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cleanup.shutdown();
    tracing::info!("Server stopped; session sweep halted");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?err, "Failed to listen for shutdown signal");
    }
}
