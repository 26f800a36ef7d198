use anyhow::{bail, Context, Result};

/// Default model identifier, LiteLLM-style. The provider client strips the
/// `anthropic/` prefix before hitting the Anthropic API.
pub const DEFAULT_MODEL_ID: &str = "anthropic/claude-sonnet-4-20250514";

/// Application configuration loaded from environment variables.
/// Constructed once in `main` and passed explicitly; there is no reload.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub model_id: String,
    pub port: u16,
    pub stream_outputs: bool,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let anthropic_api_key = require_env("ANTHROPIC_API_KEY")?;
        if anthropic_api_key.trim().is_empty() {
            bail!("ANTHROPIC_API_KEY is set but empty");
        }

        Ok(Config {
            anthropic_api_key,
            model_id: std::env::var("MODEL_ID").unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            stream_outputs: std::env::var("STREAM_OUTPUTS")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Accepts `true`/`1` (case-insensitive) as enabled; anything else is off.
fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1")
}
