use crate::errors::{AppError, Result};
use std::path::PathBuf;

/// Process-wide configuration, resolved once at startup from the environment
/// and passed explicitly into the router state.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub uploads_dir: PathBuf,
    pub public_base_url: String,
    pub rate_limit_per_sec: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(v) => v
                .parse()
                .map_err(|_| AppError::ConfigError(format!("Invalid PORT value: {}", v)))?,
            Err(_) => 8080,
        };

        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| "catalog.db".to_string());

        let uploads_dir: PathBuf = std::env::var("UPLOADS_DIR")
            .unwrap_or_else(|_| "uploads".to_string())
            .into();

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port));

        let rate_limit_per_sec = match std::env::var("RATE_LIMIT_PER_SEC") {
            Ok(v) => v.parse().map_err(|_| {
                AppError::ConfigError(format!("Invalid RATE_LIMIT_PER_SEC value: {}", v))
            })?,
            Err(_) => 50,
        };

        Ok(Self {
            port,
            database_path,
            uploads_dir,
            public_base_url,
            rate_limit_per_sec,
        })
    }
}
