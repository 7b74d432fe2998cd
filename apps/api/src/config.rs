use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

const DEFAULT_INFERENCE_URL: &str = "http://127.0.0.1:1234/v1/completions";
const DEFAULT_MODEL: &str = "gemma-2-2b-it";
const DEFAULT_MAX_TOKENS: u32 = 500;
const DEFAULT_MAX_PROMPT_CHARS: usize = 400_000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every value has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub inference_url: String,
    pub inference_model: String,
    pub inference_max_tokens: u32,
    /// Unset means the inference call waits for as long as the endpoint takes.
    pub inference_timeout_secs: Option<u64>,
    pub max_prompt_chars: usize,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            inference_url: env_or("INFERENCE_URL", DEFAULT_INFERENCE_URL),
            inference_model: env_or("INFERENCE_MODEL", DEFAULT_MODEL),
            inference_max_tokens: parse_env("INFERENCE_MAX_TOKENS")?
                .unwrap_or(DEFAULT_MAX_TOKENS),
            inference_timeout_secs: parse_env("INFERENCE_TIMEOUT_SECS")?,
            max_prompt_chars: parse_env("MAX_PROMPT_CHARS")?.unwrap_or(DEFAULT_MAX_PROMPT_CHARS),
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", "uploads")),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES")?.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            port: parse_env("PORT")?.unwrap_or(8080),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        _ => Ok(None),
    }
}
