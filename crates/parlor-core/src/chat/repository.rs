//! ConversationRepository trait definition.
//!
//! The durable record of conversations and their ordered messages.
//! Implementations live in parlor-infra (e.g., `SqliteConversationRepository`).
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use parlor_types::chat::{Conversation, StoredMessage};
use parlor_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for conversation and message persistence.
pub trait ConversationRepository: Send + Sync {
    /// Persist a new conversation with no initial messages.
    fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Whether a conversation with the given id exists.
    fn conversation_exists(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Insert a new immutable message. Fails with `NotFound` if the owning
    /// conversation does not exist.
    fn append_message(
        &self,
        message: &StoredMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All messages of a conversation, ascending by created_at. Returns an
    /// empty vec for a conversation with no messages yet.
    fn list_messages(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<StoredMessage>, RepositoryError>> + Send;
}
