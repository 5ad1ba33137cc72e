//! Configuration loaded from the environment.
//!
//! Everything is overridable via env vars so the assistant can run against a
//! different model, endpoint, or data directory without code changes. API keys
//! come from `GROQ_API_KEY` and/or numbered `GROQ_API_KEY_1`, `GROQ_API_KEY_2`,
//! ... vars; every key found joins the rotation pool.

use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::ConfigError;

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai";
const DEFAULT_MODEL: &str = "llama3-8b-8192";
const DEFAULT_RESTAURANTS_FILE: &str = "data/restaurants.json";
const DEFAULT_RESERVATIONS_FILE: &str = "data/reservations.json";
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_BASE_SECS: f64 = 2.0;
const DEFAULT_RETRY_JITTER_SECS: f64 = 1.0;

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub data: DataConfig,
}

/// Settings for the Groq chat-completions provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key pool, rotated through on rate limits.
    pub api_keys: Vec<SecretString>,
    /// Base URL, without the `/v1/...` suffix.
    pub base_url: String,
    pub model: String,
    /// Retry budget per key; total attempts are `max_retries * api_keys.len()`.
    pub max_retries: u32,
    /// Exponential backoff base, in seconds.
    pub retry_base_secs: f64,
    /// Upper bound on random jitter added to each backoff, in seconds.
    pub retry_jitter_secs: f64,
}

/// Paths to the JSON-file-backed stores.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub restaurants_file: PathBuf,
    pub reservations_file: PathBuf,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Fails only when no API key is present; everything else has defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut api_keys = Vec::new();

        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            if !key.is_empty() {
                api_keys.push(SecretString::from(key));
            }
        }
        for n in 1.. {
            match std::env::var(format!("GROQ_API_KEY_{n}")) {
                Ok(key) if !key.is_empty() => api_keys.push(SecretString::from(key)),
                _ => break,
            }
        }

        if api_keys.is_empty() {
            return Err(ConfigError::MissingApiKeys);
        }

        Ok(Self {
            llm: LlmConfig {
                api_keys,
                base_url: env_or("GROQ_BASE_URL", DEFAULT_BASE_URL),
                model: env_or("GROQ_MODEL", DEFAULT_MODEL),
                max_retries: env_parsed("TABLEHOP_MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
                retry_base_secs: env_parsed("TABLEHOP_RETRY_BASE_SECS", DEFAULT_RETRY_BASE_SECS)?,
                retry_jitter_secs: env_parsed(
                    "TABLEHOP_RETRY_JITTER_SECS",
                    DEFAULT_RETRY_JITTER_SECS,
                )?,
            },
            data: DataConfig {
                restaurants_file: env_or("TABLEHOP_RESTAURANTS_FILE", DEFAULT_RESTAURANTS_FILE)
                    .into(),
                reservations_file: env_or("TABLEHOP_RESERVATIONS_FILE", DEFAULT_RESERVATIONS_FILE)
                    .into(),
            },
        })
    }
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}
