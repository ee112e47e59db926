use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub rust_log: String,
    pub match_default_limit: usize,
    pub match_search_limit: usize,
    pub match_max_limit: usize,
    pub pool_fetch_timeout: Duration,
    /// Optional JSON file overriding the built-in scoring profiles.
    pub scoring_profiles_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            match_default_limit: parse_limit("MATCH_DEFAULT_LIMIT", 20)?,
            match_search_limit: parse_limit("MATCH_SEARCH_LIMIT", 50)?,
            match_max_limit: parse_limit("MATCH_MAX_LIMIT", 50)?,
            pool_fetch_timeout: Duration::from_millis(parse_env("POOL_FETCH_TIMEOUT_MS", 5000)?),
            scoring_profiles_path: std::env::var("SCORING_PROFILES_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
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
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Result limits must allow at least one match.
fn parse_limit(key: &str, default: usize) -> Result<usize> {
    let limit = parse_env(key, default)?;
    ensure!(limit > 0, "{key} must be greater than zero");
    Ok(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default_and_override() {
        std::env::remove_var("SKILLMATCH_TEST_LIMIT");
        assert_eq!(parse_env::<usize>("SKILLMATCH_TEST_LIMIT", 20).unwrap(), 20);

        std::env::set_var("SKILLMATCH_TEST_LIMIT", " 35 ");
        assert_eq!(parse_env::<usize>("SKILLMATCH_TEST_LIMIT", 20).unwrap(), 35);

        std::env::set_var("SKILLMATCH_TEST_LIMIT", "lots");
        assert!(parse_env::<usize>("SKILLMATCH_TEST_LIMIT", 20).is_err());
        std::env::remove_var("SKILLMATCH_TEST_LIMIT");
    }

    #[test]
    fn test_zero_limit_rejected() {
        std::env::set_var("SKILLMATCH_TEST_MAX_LIMIT", "0");
        let err = parse_limit("SKILLMATCH_TEST_MAX_LIMIT", 50).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));

        std::env::set_var("SKILLMATCH_TEST_MAX_LIMIT", "25");
        assert_eq!(parse_limit("SKILLMATCH_TEST_MAX_LIMIT", 50).unwrap(), 25);
        std::env::remove_var("SKILLMATCH_TEST_MAX_LIMIT");
        assert_eq!(parse_limit("SKILLMATCH_TEST_MAX_LIMIT", 50).unwrap(), 50);
    }

    #[test]
    fn test_require_env_names_missing_key() {
        let err = require_env("SKILLMATCH_TEST_MISSING").unwrap_err();
        assert!(err.to_string().contains("SKILLMATCH_TEST_MISSING"));
    }
}
