use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    /// Public base URL of this service; OAuth callbacks are built from it.
    pub auth_url: String,
    pub github_client_id: String,
    pub github_client_secret: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub session_max_age_days: i64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            database_max_connections: env_or("DATABASE_MAX_CONNECTIONS", "10")
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            auth_url: env_or("AUTH_URL", "http://localhost:8080"),
            github_client_id: require_env("AUTH_GITHUB_ID")?,
            github_client_secret: require_env("AUTH_GITHUB_SECRET")?,
            google_client_id: require_env("AUTH_GOOGLE_ID")?,
            google_client_secret: require_env("AUTH_GOOGLE_SECRET")?,
            session_max_age_days: parse_session_max_age(&env_or("SESSION_MAX_AGE_DAYS", "30"))?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

/// Longest session lifetime accepted from the environment (ten years).
const MAX_SESSION_AGE_DAYS: i64 = 3650;

fn parse_session_max_age(raw: &str) -> Result<i64> {
    let days = raw
        .trim()
        .parse::<i64>()
        .context("SESSION_MAX_AGE_DAYS must be a whole number of days")?;
    if !(1..=MAX_SESSION_AGE_DAYS).contains(&days) {
        bail!("SESSION_MAX_AGE_DAYS must be between 1 and {MAX_SESSION_AGE_DAYS}, got {days}");
    }
    Ok(days)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
