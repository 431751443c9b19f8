//! Wire types for the Groq chat completions API (OpenAI-compatible).
//!
//! Only the request side is typed. The response body is handed back as raw
//! `serde_json::Value` so the core's defensive extraction can deal with
//! whatever shape actually arrives.

use serde::Serialize;

use parlor_types::llm::CompletionRequest;

/// Request body for `POST /openai/v1/chat/completions`.
#[derive(Debug, Serialize)]
pub struct GroqRequest {
    pub model: String,
    pub messages: Vec<GroqMessage>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// A single message in the provider request.
#[derive(Debug, Serialize)]
pub struct GroqMessage {
    pub role: String,
    pub content: String,
}

impl From<&CompletionRequest> for GroqRequest {
    fn from(request: &CompletionRequest) -> Self {
        Self {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|turn| GroqMessage {
                    role: turn.role.to_string(),
                    content: turn.content.clone(),
                })
                .collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}
