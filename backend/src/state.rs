use std::sync::Arc;

use sqlx::PgPool;

use crate::{config::Config, services::mailer::Mailer, utils::signing_key::SigningKey};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub signing_key: SigningKey,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        config: Config,
        signing_key: SigningKey,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            pool,
            config,
            signing_key,
            mailer,
        }
    }
}
