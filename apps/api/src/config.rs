use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    /// Ask the provider for `application/json` output instead of relying on prompt instructions alone.
    pub gemini_json_mode: bool,
    /// Upper bound on a single provider call.
    pub timeout_secs: u64,
    /// 0 = fail fast.
    pub max_retries: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_api_base: env_or("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE),
            gemini_json_mode: env_or("GEMINI_JSON_MODE", "false")
                .parse::<bool>()
                .context("GEMINI_JSON_MODE must be 'true' or 'false'")?,
            timeout_secs: env_or("FORTUNE_TIMEOUT_SECS", "30")
                .parse::<u64>()
                .context("FORTUNE_TIMEOUT_SECS must be a whole number of seconds")?,
            max_retries: env_or("FORTUNE_MAX_RETRIES", "0")
                .parse::<u32>()
                .context("FORTUNE_MAX_RETRIES must be a non-negative integer")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
impl Config {
    pub(crate) fn for_tests() -> Self {
        Config {
            gemini_api_key: "test-key".to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_api_base: "https://example.test/v1beta/".to_string(),
            gemini_json_mode: false,
            timeout_secs: 5,
            max_retries: 0,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}
