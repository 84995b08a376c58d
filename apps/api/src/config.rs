use std::time::Duration;

use anyhow::{Context, Result};

use crate::analysis_client::{DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT};
use crate::matching::cache::DEFAULT_TTL;

/// Application configuration loaded from environment variables.
/// Every variable is optional; unparseable values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Analysis provider endpoint. `None` runs the service on local matching only.
    pub analysis_api_url: Option<String>,
    pub cache_ttl: Duration,
    pub remote_timeout: Duration,
    pub remote_max_attempts: u32,
    pub remote_backoff: Duration,
    /// Replaces the built-in skill dictionary when set.
    pub skill_dictionary: Option<Vec<String>>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_attempts: u32 = parse_or(&non_empty, "REMOTE_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
        if max_attempts == 0 {
            anyhow::bail!("REMOTE_MAX_ATTEMPTS must be at least 1");
        }

        Ok(Config {
            port: parse_or(&non_empty, "PORT", 8080)?,
            rust_log: non_empty("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            analysis_api_url: non_empty("ANALYSIS_API_URL"),
            cache_ttl: Duration::from_secs(parse_or(
                &non_empty,
                "CACHE_TTL_SECS",
                DEFAULT_TTL.as_secs(),
            )?),
            remote_timeout: Duration::from_secs(parse_or(
                &non_empty,
                "REMOTE_TIMEOUT_SECS",
                DEFAULT_TIMEOUT.as_secs(),
            )?),
            remote_max_attempts: max_attempts,
            remote_backoff: Duration::from_millis(parse_or(
                &non_empty,
                "REMOTE_BACKOFF_MS",
                DEFAULT_BACKOFF.as_millis() as u64,
            )?),
            skill_dictionary: non_empty("SKILL_DICTIONARY")
                .map(|list| list.split(',').map(|s| s.trim().to_string()).collect()),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
