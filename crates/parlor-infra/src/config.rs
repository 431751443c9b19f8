//! Environment configuration loading.
//!
//! Loading never fails the process: malformed values fall back to defaults
//! and a missing credential is tolerated (it is checked lazily in the reply
//! generator, per call). The credential is looked up under several alternate
//! variable names, first match wins.

use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use tracing::warn;

use parlor_types::config::{AppConfig, DeployMode};

/// Credential variable names, in priority order.
const API_KEY_VARS: &[&str] = &[
    "GROQ_API_KEY",
    "GROQ_API",
    "GROQ_API_TOKEN",
    "GROQ_KEY",
    "OPENAI_API_KEY",
];

/// Load the application configuration from the environment.
pub fn load_config() -> AppConfig {
    let defaults = AppConfig::default();

    let api_key = API_KEY_VARS
        .iter()
        .find_map(|name| std::env::var(name).ok())
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from);

    let env: DeployMode = std::env::var("PARLOR_ENV")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DeployMode::Development);

    if api_key.is_none() && env == DeployMode::Production {
        warn!(
            checked = %API_KEY_VARS.join(", "),
            "no provider API key found; chat requests will return 503"
        );
    }

    AppConfig {
        api_key,
        model: defaults.model.clone(),
        max_tokens: env_parse("MAX_TOKENS", defaults.max_tokens),
        temperature: defaults.temperature,
        max_message_length: env_parse("MAX_MESSAGE_LENGTH", defaults.max_message_length),
        rate_limit_window: Duration::from_millis(env_parse(
            "RATE_LIMIT_WINDOW_MS",
            defaults.rate_limit_window.as_millis() as u64,
        )),
        rate_limit_max_requests: env_parse(
            "RATE_LIMIT_MAX_REQUESTS",
            defaults.rate_limit_max_requests,
        ),
        allowed_origin: std::env::var("FRONTEND_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.allowed_origin),
        port: env_parse("PORT", defaults.port),
        env,
    }
}

/// Parse an env var, falling back to `default` when unset or malformed.
fn env_parse<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(value) => match value.trim().parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(var = name, value = %value, "malformed env var; using default");
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env var tests mutate process state; each uses unique names to stay
    // independent of test ordering.

    #[test]
    fn test_env_parse_default_when_unset() {
        assert_eq!(env_parse("PARLOR_TEST_UNSET_XYZ", 42u32), 42);
    }

    #[test]
    fn test_env_parse_reads_value() {
        // SAFETY: unique var name, removed before the test returns.
        unsafe { std::env::set_var("PARLOR_TEST_PARSE_1", "7") };
        assert_eq!(env_parse("PARLOR_TEST_PARSE_1", 42u32), 7);
        unsafe { std::env::remove_var("PARLOR_TEST_PARSE_1") };
    }

    #[test]
    fn test_env_parse_malformed_falls_back() {
        // SAFETY: unique var name, removed before the test returns.
        unsafe { std::env::set_var("PARLOR_TEST_PARSE_2", "not a number") };
        assert_eq!(env_parse("PARLOR_TEST_PARSE_2", 42u32), 42);
        unsafe { std::env::remove_var("PARLOR_TEST_PARSE_2") };
    }
}
