//! Process-wide configuration.
//!
//! `AppConfig` is read once from the environment at startup and is read-only
//! afterwards. The provider credential is wrapped in
//! [`secrecy::SecretString`] so it never appears in Debug output or logs.
//!
//! A missing credential is NOT an error here: the reply generator checks it
//! lazily at call time, so `/health` and the transcript read path keep
//! working when the provider is unset.

use secrecy::SecretString;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Deployment mode, affecting mock fallback and error message exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployMode {
    Development,
    Production,
}

impl fmt::Display for DeployMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployMode::Development => write!(f, "development"),
            DeployMode::Production => write!(f, "production"),
        }
    }
}

impl FromStr for DeployMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Anything that is not explicitly production counts as development.
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(DeployMode::Production),
            _ => Ok(DeployMode::Development),
        }
    }
}

/// Application configuration, immutable after process start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Provider API key; `None` triggers the dev mock or a 503 (see mode).
    pub api_key: Option<SecretString>,
    /// Fixed completion model identifier.
    pub model: String,
    /// Maximum output-token budget per completion.
    pub max_tokens: u32,
    /// Fixed sampling temperature.
    pub temperature: f64,
    /// Maximum accepted chat message length (after trimming).
    pub max_message_length: usize,
    /// Sliding window size for the per-client rate limiter.
    pub rate_limit_window: Duration,
    /// Maximum requests per client within one window.
    pub rate_limit_max_requests: u32,
    /// Allowed CORS origin for browser callers.
    pub allowed_origin: String,
    /// HTTP listening port.
    pub port: u16,
    /// Deployment mode.
    pub env: DeployMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "llama-3.1-8b-instant".to_string(),
            max_tokens: 500,
            temperature: 0.7,
            max_message_length: 2000,
            rate_limit_window: Duration::from_secs(15 * 60),
            rate_limit_max_requests: 1000,
            allowed_origin: "http://localhost:5173".to_string(),
            port: 3000,
            env: DeployMode::Development,
        }
    }
}

impl AppConfig {
    /// Whether the process runs in production mode.
    pub fn is_production(&self) -> bool {
        self.env == DeployMode::Production
    }
}
