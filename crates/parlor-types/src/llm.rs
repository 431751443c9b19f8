//! LLM request types and provider error taxonomy.
//!
//! The completion response is deliberately left untyped
//! (`serde_json::Value`): the provider's response shape is not fully
//! trusted, and normalization happens over the generic JSON tree in
//! `parlor-core` rather than over concrete SDK types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a turn in the provider-bound message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::System => write!(f, "system"),
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for TurnRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(TurnRole::System),
            "user" => Ok(TurnRole::User),
            "assistant" => Ok(TurnRole::Assistant),
            other => Err(format!("invalid turn role: '{other}'")),
        }
    }
}

/// A single turn in a provider-bound conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

/// Request to the completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatTurn>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Errors from the completion provider, classified at the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("rate limited by provider")]
    RateLimited,

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("network error: {0}")]
    Network(String),

    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_role_roundtrip() {
        for role in [TurnRole::System, TurnRole::User, TurnRole::Assistant] {
            let s = role.to_string();
            let parsed: TurnRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_turn_role_serde() {
        let json = serde_json::to_string(&TurnRole::User).unwrap();
        assert_eq!(json, "\"user\"");
    }

    #[test]
    fn test_completion_request_omits_missing_temperature() {
        let req = CompletionRequest {
            model: "m".to_string(),
            messages: Vec::new(),
            max_tokens: 500,
            temperature: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("temperature"));
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::Network("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }
}
