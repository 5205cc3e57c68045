use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Upload cap for resume documents.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every setting has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// `*` for any origin, otherwise a comma-separated list.
    pub cors_origins: String,
    pub analysis_timeout: Duration,
    pub keyword_limit: usize,
    pub skill_taxonomy_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 5000,
            rust_log: "info".to_string(),
            cors_origins: "*".to_string(),
            analysis_timeout: Duration::from_secs(30),
            keyword_limit: 30,
            skill_taxonomy_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        let config = Config {
            port: parse_env("PORT", defaults.port)
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            cors_origins: std::env::var("CORS_ORIGINS").unwrap_or(defaults.cors_origins),
            analysis_timeout: Duration::from_secs(
                parse_env("ANALYSIS_TIMEOUT_SECS", defaults.analysis_timeout.as_secs())
                    .context("ANALYSIS_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            keyword_limit: parse_env("KEYWORD_LIMIT", defaults.keyword_limit)
                .context("KEYWORD_LIMIT must be a positive integer")?,
            skill_taxonomy_path: std::env::var("SKILL_TAXONOMY_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        };

        if config.keyword_limit == 0 {
            anyhow::bail!("KEYWORD_LIMIT must be a positive integer");
        }
        if config.analysis_timeout.is_zero() {
            anyhow::bail!("ANALYSIS_TIMEOUT_SECS must be greater than zero");
        }

        Ok(config)
    }

    /// Upload cap reported to clients, in whole MiB.
    pub fn max_upload_mb(&self) -> usize {
        MAX_UPLOAD_BYTES / (1024 * 1024)
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for environment variable '{key}'")),
        Err(_) => Ok(default),
    }
}
