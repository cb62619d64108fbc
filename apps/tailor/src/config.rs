use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::BackendKind;

/// Application configuration loaded from environment variables.
/// Fails at startup on malformed values or an unknown default backend.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub default_backend: BackendKind,
    pub openai_model: String,
    pub anthropic_model: String,
    /// Minimum spacing between two calls to the same backend.
    pub min_call_interval: Duration,
    /// A rewrite longer than this multiple of the original is assumed to carry an explanation.
    pub rewrite_max_length_ratio: f64,
    pub jobs_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let default_backend = optional_env("DEFAULT_BACKEND")
            .unwrap_or_else(|| "openai".to_string())
            .parse::<BackendKind>()
            .context("DEFAULT_BACKEND must be 'openai' or 'anthropic'")?;

        let min_call_interval_ms = optional_env("GENERATION_MIN_INTERVAL_MS")
            .unwrap_or_else(|| "1000".to_string())
            .parse::<u64>()
            .context("GENERATION_MIN_INTERVAL_MS must be a whole number of milliseconds")?;

        let rewrite_max_length_ratio = optional_env("REWRITE_MAX_LENGTH_RATIO")
            .unwrap_or_else(|| "3.0".to_string())
            .parse::<f64>()
            .context("REWRITE_MAX_LENGTH_RATIO must be a number")?;

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            default_backend,
            openai_model: optional_env("OPENAI_MODEL").unwrap_or_else(|| "gpt-4".to_string()),
            anthropic_model: optional_env("ANTHROPIC_MODEL")
                .unwrap_or_else(|| "claude-sonnet-4-5".to_string()),
            min_call_interval: Duration::from_millis(min_call_interval_ms),
            rewrite_max_length_ratio,
            jobs_dir: PathBuf::from(
                optional_env("JOBS_DIR").unwrap_or_else(|| "jobs".to_string()),
            ),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads a variable, treating unset and blank the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
