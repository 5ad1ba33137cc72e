//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the JSON file stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Errors from the LLM provider layer.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no API keys configured (set GROQ_API_KEY or GROQ_API_KEY_1..)")]
    MissingApiKeys,

    #[error("gave up after {attempts} attempts: {reason}")]
    RetriesExhausted { attempts: u32, reason: String },
}

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API keys configured (set GROQ_API_KEY or GROQ_API_KEY_1..)")]
    MissingApiKeys,

    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}
