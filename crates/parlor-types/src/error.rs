use thiserror::Error;

/// Errors from repository operations (used by trait definitions in parlor-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Caller-visible chat errors, each carrying its HTTP status class.
///
/// Classified errors pass through orchestration unchanged; anything else is
/// rewrapped as `Processing` at the orchestrator boundary so raw storage or
/// driver error text never reaches callers.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),

    #[error("Conversation not found")]
    ConversationNotFound,

    #[error("{0}")]
    ProviderMisconfigured(String),

    #[error("AI service is temporarily busy. Please try again in a moment.")]
    ProviderBusy,

    #[error("{0}")]
    UpstreamUnavailable(String),

    #[error("{0}")]
    Processing(String),
}

impl ChatError {
    /// The HTTP status class for this error kind.
    pub fn status_code(&self) -> u16 {
        match self {
            ChatError::Validation(_) => 400,
            ChatError::ConversationNotFound => 404,
            ChatError::ProviderBusy => 429,
            ChatError::UpstreamUnavailable(_) => 502,
            ChatError::ProviderMisconfigured(_) => 503,
            ChatError::Processing(_) => 500,
        }
    }
}
