//! One-shot operational sweep: purges expired session records and stale
//! password-reset tokens, then exits. The server runs the same sweep on a
//! timer; this bin exists for cron-style deployments and manual cleanup.

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use userdesk_backend::{
    config::Config,
    db::connection::create_pool,
    repositories::{password_reset as password_reset_repo, session as session_repo},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "userdesk_backend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    let pool = create_pool(&config.database_url).await?;

    let purged_sessions = session_repo::delete_expired_before(&pool, Utc::now()).await?;
    tracing::info!(purged = purged_sessions, "Purged expired sessions");

    let purged_resets = password_reset_repo::delete_expired_tokens(&pool).await?;
    tracing::info!(purged = purged_resets, "Purged expired password reset tokens");

    Ok(())
}
