//! CompletionApi trait definition.
//!
//! One synchronous completion request per call: no retry, no streaming.
//! The response is returned as raw JSON rather than a typed SDK shape --
//! normalization of the untrusted response tree happens in
//! [`crate::reply::extract`].

use parlor_types::llm::{CompletionRequest, LlmError};

/// Contract for the external completion provider.
///
/// Implementations classify transport-level failures into the [`LlmError`]
/// taxonomy (rate limit, auth, network, other) before returning.
pub trait CompletionApi: Send + Sync {
    /// Send one completion request and return the provider's raw JSON
    /// response body.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<serde_json::Value, LlmError>> + Send;
}
