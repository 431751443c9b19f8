//! GroqClient -- concrete [`CompletionApi`] implementation for the Groq
//! chat completions API.
//!
//! One non-streaming request per call with bearer authentication. Transport
//! failures are classified into the [`LlmError`] taxonomy here; the response
//! body is returned as raw JSON for the core's defensive extraction.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when building the Authorization header.

pub mod types;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use parlor_core::llm::provider::CompletionApi;
use parlor_types::llm::{CompletionRequest, LlmError};

use self::types::GroqRequest;

/// Words in an error message that indicate a network-level failure.
const NETWORK_VOCABULARY: &[&str] = &[
    "network",
    "timeout",
    "timed out",
    "connection refused",
    "connect",
    "dns",
];

/// Groq chat completions client.
pub struct GroqClient {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
}

// GroqClient intentionally does NOT derive Debug to prevent accidental
// exposure of internal state including the API key.

impl GroqClient {
    /// Create a new client. A `None` key is valid -- the reply generator
    /// never calls `complete` without one, but construction must not fail
    /// so the process can start with the provider unset.
    pub fn new(api_key: Option<SecretString>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://api.groq.com/openai".to_string(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

/// Classify a reqwest transport error.
fn map_transport_error(err: reqwest::Error) -> LlmError {
    if err.is_timeout() || err.is_connect() {
        return LlmError::Network(err.to_string());
    }
    let message = err.to_string();
    if looks_like_network_error(&message) {
        return LlmError::Network(message);
    }
    LlmError::Provider { message }
}

/// Whether an error message matches the network/timeout vocabulary.
fn looks_like_network_error(message: &str) -> bool {
    let lowered = message.to_lowercase();
    NETWORK_VOCABULARY
        .iter()
        .any(|needle| lowered.contains(needle))
}

impl CompletionApi for GroqClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<serde_json::Value, LlmError> {
        // The generator guards this path; reaching it without a key is the
        // same misconfiguration as an upstream credential rejection.
        let api_key = self.api_key.as_ref().ok_or(LlmError::AuthenticationFailed)?;

        let body = GroqRequest::from(request);
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                429 => LlmError::RateLimited,
                401 | 403 => LlmError::AuthenticationFailed,
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_types::llm::{ChatTurn, TurnRole};

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "llama-3.1-8b-instant".to_string(),
            messages: vec![ChatTurn { role: TurnRole::User, content: "hi".to_string() }],
            max_tokens: 500,
            temperature: Some(0.7),
        }
    }

    #[test]
    fn test_network_vocabulary() {
        assert!(looks_like_network_error("error sending request: Connection refused"));
        assert!(looks_like_network_error("operation timed out"));
        assert!(looks_like_network_error("DNS resolution failed"));
        assert!(!looks_like_network_error("invalid json payload"));
    }

    #[tokio::test]
    async fn test_missing_key_is_authentication_failure() {
        let client = GroqClient::new(None);
        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Port 9 (discard) is closed locally; the connection is refused
        // without leaving the machine.
        let client = GroqClient::new(Some(SecretString::from("gsk_test")))
            .with_base_url("http://127.0.0.1:9/openai".to_string());

        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Network(_)), "got: {err:?}");
    }
}
