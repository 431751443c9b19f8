//! ReplyGenerator -- wraps one completion call and normalizes the result.
//!
//! The provider credential is checked lazily, at call time, never at process
//! start: an unset key must not take down `/health` or the transcript read
//! path. In development mode a missing key degrades to a deterministic local
//! echo so the rest of the system stays exercisable; in production it raises
//! the misconfiguration signal.

use tracing::{debug, warn};

use parlor_types::config::AppConfig;
use parlor_types::error::ChatError;
use parlor_types::llm::{ChatTurn, CompletionRequest, LlmError, TurnRole};

use crate::llm::provider::CompletionApi;
use crate::reply::extract::extract_reply;

/// Fixed persona/policy prompt sent as the first message of every request.
const SYSTEM_PROMPT: &str = "You are a helpful and friendly customer support agent \
for a small e-commerce store.\nAlways be polite, concise, and professional.";

/// Returned when the provider response contains no usable text anywhere.
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn't generate a response right now. Please try again in a moment.";

/// Generates one assistant reply per call via the completion provider.
pub struct ReplyGenerator<C: CompletionApi> {
    client: C,
    config: AppConfig,
}

impl<C: CompletionApi> ReplyGenerator<C> {
    pub fn new(client: C, config: AppConfig) -> Self {
        Self { client, config }
    }

    /// Generate a reply for `user_message` given the conversation history.
    ///
    /// `history` is the full ordered transcript in provider vocabulary; the
    /// new user message is appended as the explicit final turn after it.
    pub async fn generate_reply(
        &self,
        history: &[ChatTurn],
        user_message: &str,
    ) -> Result<String, ChatError> {
        // Lazy credential check: fail (or mock) only when a reply is
        // actually needed.
        if self.config.api_key.is_none() {
            if self.config.is_production() {
                return Err(ChatError::ProviderMisconfigured(
                    "AI provider misconfigured: GROQ_API_KEY is missing".to_string(),
                ));
            }
            warn!("no provider API key set; returning dev mock reply");
            return Ok(format!("[dev mock] I received your message: {user_message}"));
        }

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatTurn {
            role: TurnRole::System,
            content: SYSTEM_PROMPT.to_string(),
        });
        messages.extend_from_slice(history);
        messages.push(ChatTurn {
            role: TurnRole::User,
            content: user_message.to_string(),
        });

        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
        };

        let completion = self
            .client
            .complete(&request)
            .await
            .map_err(map_llm_error)?;

        if !self.config.is_production() {
            debug!(completion = %completion, "raw provider completion");
        }

        match extract_reply(&completion) {
            Some(reply) => Ok(reply),
            None => {
                // Degrade to the fixed fallback sentence rather than raising:
                // a parse failure of the provider's shape is not the
                // caller's problem.
                warn!("provider returned empty/unknown completion shape; using fallback reply");
                Ok(FALLBACK_REPLY.to_string())
            }
        }
    }
}

/// Translate transport-level provider failures into caller-visible signals.
fn map_llm_error(err: LlmError) -> ChatError {
    match err {
        LlmError::RateLimited => ChatError::ProviderBusy,
        LlmError::AuthenticationFailed => ChatError::ProviderMisconfigured(
            "AI provider authentication failed. Please verify the API key/configuration."
                .to_string(),
        ),
        LlmError::Network(reason) => {
            warn!(reason = %reason, "network error contacting AI service");
            ChatError::UpstreamUnavailable(
                "Network error contacting AI service. Please try again later.".to_string(),
            )
        }
        other => {
            warn!(error = %other, "provider request failed");
            ChatError::Processing(
                "Failed to generate AI response. Please try again later.".to_string(),
            )
        }
    }
}
