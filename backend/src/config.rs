use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    /// Optional path the signing key is loaded from (and persisted to on
    /// first boot). When unset the key lives only in process memory.
    pub signing_key_file: Option<PathBuf>,
    /// Embedded (cryptographic) token lifetime. Fixed at issuance.
    pub token_expiration_hours: u64,
    /// Soft/idle session window applied when a session is created.
    pub session_idle_minutes: i64,
    /// Period of the background sweep that purges expired sessions.
    pub cleanup_interval_minutes: u64,
    pub port: u16,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/userdesk".to_string());

        let signing_key_file = env::var("SIGNING_KEY_FILE").ok().map(PathBuf::from);

        let token_expiration_hours = env::var("TOKEN_EXPIRATION_HOURS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        let session_idle_minutes = env::var("SESSION_IDLE_MINUTES")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let cleanup_interval_minutes = env::var("CLEANUP_INTERVAL_MINUTES")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .unwrap_or(15);

        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);

        Ok(Config {
            database_url,
            signing_key_file,
            token_expiration_hours,
            session_idle_minutes,
            cleanup_interval_minutes,
            port,
        })
    }
}
