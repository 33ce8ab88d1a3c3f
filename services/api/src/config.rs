//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which AI backend answers chat questions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    /// A local self-hosted generation endpoint (Ollama-style `/api/generate`).
    Ollama,
    /// A hosted chat-completion API.
    OpenAi,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// Directory holding users.json, admissions.json, college_info.txt and
    /// activity.log.
    pub data_dir: PathBuf,
    pub log_level: Level,
    pub cors_origins: Vec<String>,
    pub provider: ProviderKind,
    pub ai_model: String,
    pub ai_temperature: f32,
    pub ai_max_tokens: u32,
    pub ai_timeout: Duration,
    pub ollama_url: String,
    pub openai_api_key: Option<String>,
    /// Maximum chat messages retained per session (two per exchange).
    pub chat_window: usize,
    pub session_ttl: chrono::Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:5000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // --- Load AI Provider Settings ---
        let provider_str = std::env::var("AI_PROVIDER").unwrap_or_else(|_| "ollama".to_string());
        let provider = match provider_str.to_lowercase().as_str() {
            "ollama" => ProviderKind::Ollama,
            "openai" => ProviderKind::OpenAi,
            other => {
                return Err(ConfigError::InvalidValue(
                    "AI_PROVIDER".to_string(),
                    format!("'{}' is not a supported provider", other),
                ))
            }
        };

        let ai_model = std::env::var("AI_MODEL").unwrap_or_else(|_| {
            match provider {
                ProviderKind::Ollama => "mistral",
                ProviderKind::OpenAi => "gpt-3.5-turbo",
            }
            .to_string()
        });

        let ai_temperature = parse_var("AI_TEMPERATURE", 0.7f32)?;
        let ai_max_tokens = parse_var("AI_MAX_TOKENS", 300u32)?;
        let ai_timeout = Duration::from_secs(parse_var("AI_TIMEOUT_SECS", 60u64)?);

        let ollama_url =
            std::env::var("OLLAMA_URL").unwrap_or_else(|_| "http://localhost:11434".to_string());
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();

        // --- Load Session Settings ---
        let chat_window = parse_var("CHAT_HISTORY_MESSAGES", 6usize)?;
        let session_ttl = chrono::Duration::hours(parse_var("SESSION_TTL_HOURS", 24i64)?);

        Ok(Self {
            bind_address,
            data_dir,
            log_level,
            cors_origins,
            provider,
            ai_model,
            ai_temperature,
            ai_max_tokens,
            ai_timeout,
            ollama_url,
            openai_api_key,
            chat_window,
            session_ttl,
        })
    }
}

/// Reads an environment variable and parses it, falling back to `default`
/// when the variable is unset.
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}
