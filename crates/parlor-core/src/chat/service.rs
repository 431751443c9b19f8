//! Chat orchestrator: message -> persistence -> LLM call -> persistence -> reply.
//!
//! ChatService resolves or creates the working conversation, appends the
//! user turn, loads the transcript, invokes the reply generator, appends the
//! assistant turn, and returns the reply. The five steps run strictly
//! sequentially; concurrent requests against one conversation may interleave
//! their appends (accepted race, not an invariant).

use tracing::{error, info};
use uuid::Uuid;

use parlor_types::chat::{ChatReply, Conversation, Sender, StoredMessage};
use parlor_types::error::{ChatError, RepositoryError};
use parlor_types::llm::{ChatTurn, TurnRole};

use crate::chat::repository::ConversationRepository;
use crate::llm::provider::CompletionApi;
use crate::reply::generator::ReplyGenerator;

/// Fixed caller-visible message for unclassified pipeline failures.
const PROCESSING_FAILURE: &str = "Failed to process chat message";

/// Orchestrates the chat-turn processing pipeline.
///
/// Generic over the repository and provider traits so parlor-core never
/// depends on parlor-infra.
pub struct ChatService<R: ConversationRepository, C: CompletionApi> {
    repo: R,
    generator: ReplyGenerator<C>,
}

impl<R: ConversationRepository, C: CompletionApi> ChatService<R, C> {
    pub fn new(repo: R, generator: ReplyGenerator<C>) -> Self {
        Self { repo, generator }
    }

    /// Process one chat turn and return the reply with the resolved
    /// conversation id.
    ///
    /// The user turn is persisted before the provider call and is NOT rolled
    /// back if that call fails (at-least-once-write semantics). Classified
    /// errors pass through unchanged; storage failures surface as a generic
    /// processing failure so callers never see raw driver text.
    pub async fn process_message(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<ChatReply, ChatError> {
        let conversation_id = self.resolve_conversation(session_id).await?;
        let trimmed = message.trim();

        let user_message =
            StoredMessage::new(conversation_id, Sender::User, trimmed.to_string());
        self.repo
            .append_message(&user_message)
            .await
            .map_err(unclassified)?;

        let transcript = self
            .repo
            .list_messages(&conversation_id)
            .await
            .map_err(unclassified)?;

        let history: Vec<ChatTurn> = transcript
            .iter()
            .map(|msg| ChatTurn {
                role: match msg.sender {
                    Sender::User => TurnRole::User,
                    _ => TurnRole::Assistant,
                },
                content: msg.text.clone(),
            })
            .collect();

        let reply = self.generator.generate_reply(&history, trimmed).await?;

        let assistant_message =
            StoredMessage::new(conversation_id, Sender::Assistant, reply.clone());
        self.repo
            .append_message(&assistant_message)
            .await
            .map_err(unclassified)?;

        Ok(ChatReply {
            reply,
            session_id: conversation_id,
        })
    }

    /// Full ordered transcript for the read path.
    ///
    /// Unlike the write path, an unknown (or malformed) session id is an
    /// error here: there is nothing to read.
    pub async fn transcript(&self, session_id: &str) -> Result<Vec<StoredMessage>, ChatError> {
        let id = Uuid::parse_str(session_id.trim())
            .map_err(|_| ChatError::ConversationNotFound)?;

        if !self
            .repo
            .conversation_exists(&id)
            .await
            .map_err(unclassified)?
        {
            return Err(ChatError::ConversationNotFound);
        }

        self.repo.list_messages(&id).await.map_err(unclassified)
    }

    /// Resolve the working conversation id.
    ///
    /// Session ids are advisory, not authenticated: an absent, empty,
    /// malformed, or unknown id silently gets a fresh conversation instead
    /// of failing the write path.
    async fn resolve_conversation(
        &self,
        session_id: Option<&str>,
    ) -> Result<Uuid, ChatError> {
        if let Some(sid) = session_id {
            let sid = sid.trim();
            if !sid.is_empty() {
                if let Ok(id) = Uuid::parse_str(sid) {
                    if self
                        .repo
                        .conversation_exists(&id)
                        .await
                        .map_err(unclassified)?
                    {
                        return Ok(id);
                    }
                }
            }
        }

        let conversation = Conversation::new();
        self.repo
            .create_conversation(&conversation)
            .await
            .map_err(unclassified)?;
        info!(conversation_id = %conversation.id, "created new conversation");
        Ok(conversation.id)
    }
}

/// Wrap an unclassified storage failure into the generic processing signal.
fn unclassified(err: RepositoryError) -> ChatError {
    error!(error = %err, "chat pipeline storage failure");
    ChatError::Processing(PROCESSING_FAILURE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_types::config::{AppConfig, DeployMode};
    use parlor_types::llm::{CompletionRequest, LlmError};
    use secrecy::SecretString;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// In-memory conversation store.
    #[derive(Default)]
    struct MemoryRepo {
        conversations: Mutex<HashMap<Uuid, Vec<StoredMessage>>>,
    }

    impl ConversationRepository for MemoryRepo {
        async fn create_conversation(
            &self,
            conversation: &Conversation,
        ) -> Result<(), RepositoryError> {
            self.conversations
                .lock()
                .unwrap()
                .insert(conversation.id, Vec::new());
            Ok(())
        }

        async fn conversation_exists(&self, id: &Uuid) -> Result<bool, RepositoryError> {
            Ok(self.conversations.lock().unwrap().contains_key(id))
        }

        async fn append_message(&self, message: &StoredMessage) -> Result<(), RepositoryError> {
            let mut conversations = self.conversations.lock().unwrap();
            let messages = conversations
                .get_mut(&message.conversation_id)
                .ok_or(RepositoryError::NotFound)?;
            messages.push(message.clone());
            Ok(())
        }

        async fn list_messages(
            &self,
            conversation_id: &Uuid,
        ) -> Result<Vec<StoredMessage>, RepositoryError> {
            self.conversations
                .lock()
                .unwrap()
                .get(conversation_id)
                .cloned()
                .ok_or(RepositoryError::NotFound)
        }
    }

    /// Provider fake returning the same canned result on every call.
    ///
    /// Requests are recorded through a shared handle so tests can inspect
    /// them after handing the fake to the service.
    struct CannedApi {
        reply: Option<&'static str>,
        seen: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl CannedApi {
        fn replying(reply: &'static str) -> Self {
            Self { reply: Some(reply), seen: Arc::default() }
        }

        fn failing_network() -> Self {
            Self { reply: None, seen: Arc::default() }
        }

        fn requests(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
            Arc::clone(&self.seen)
        }
    }

    impl CompletionApi for CannedApi {
        async fn complete(&self, request: &CompletionRequest) -> Result<Value, LlmError> {
            self.seen.lock().unwrap().push(request.clone());
            match self.reply {
                Some(text) => Ok(json!({ "choices": [{ "message": { "content": text } }] })),
                None => Err(LlmError::Network("connection refused".to_string())),
            }
        }
    }

    fn service(api: CannedApi) -> ChatService<MemoryRepo, CannedApi> {
        let config = AppConfig {
            api_key: Some(SecretString::from("gsk_test")),
            env: DeployMode::Development,
            ..AppConfig::default()
        };
        ChatService::new(MemoryRepo::default(), ReplyGenerator::new(api, config))
    }

    #[tokio::test]
    async fn test_new_conversation_gets_two_messages() {
        let svc = service(CannedApi::replying("hello!"));

        let result = svc.process_message("Hi", None).await.unwrap();
        assert_eq!(result.reply, "hello!");

        let transcript = svc.transcript(&result.session_id.to_string()).await.unwrap();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].sender, Sender::User);
        assert_eq!(transcript[0].text, "Hi");
        assert_eq!(transcript[1].sender, Sender::Assistant);
        assert_eq!(transcript[1].text, "hello!");
    }

    #[tokio::test]
    async fn test_existing_session_grows_by_two() {
        let svc = service(CannedApi::replying("sure"));

        let first = svc.process_message("one", None).await.unwrap();
        let sid = first.session_id.to_string();
        let second = svc.process_message("two", Some(&sid)).await.unwrap();

        assert_eq!(second.session_id, first.session_id);
        let transcript = svc.transcript(&sid).await.unwrap();
        assert_eq!(transcript.len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_session_creates_new_conversation() {
        let svc = service(CannedApi::replying("ok"));

        let unknown = Uuid::now_v7().to_string();
        let result = svc.process_message("Hi", Some(&unknown)).await.unwrap();
        assert_ne!(result.session_id.to_string(), unknown);

        let transcript = svc.transcript(&result.session_id.to_string()).await.unwrap();
        assert_eq!(transcript.len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_session_id_behaves_like_absent() {
        let svc = service(CannedApi::replying("ok"));

        let result = svc.process_message("Hi", Some("not-a-uuid")).await.unwrap();
        let transcript = svc.transcript(&result.session_id.to_string()).await.unwrap();
        assert_eq!(transcript.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_session_id_behaves_like_absent() {
        let svc = service(CannedApi::replying("ok"));
        let result = svc.process_message("Hi", Some("  ")).await.unwrap();
        assert_eq!(
            svc.transcript(&result.session_id.to_string()).await.unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn test_message_is_trimmed_before_persistence() {
        let svc = service(CannedApi::replying("ok"));

        let result = svc.process_message("  padded  ", None).await.unwrap();
        let transcript = svc.transcript(&result.session_id.to_string()).await.unwrap();
        assert_eq!(transcript[0].text, "padded");
    }

    #[tokio::test]
    async fn test_history_passed_in_provider_vocabulary() {
        let api = CannedApi::replying("ok");
        let requests = api.requests();
        let svc = service(api);

        let first = svc.process_message("one", None).await.unwrap();
        svc.process_message("two", Some(&first.session_id.to_string()))
            .await
            .unwrap();

        let seen = requests.lock().unwrap();
        // Second call: system + 3 transcript turns + explicit new user turn.
        let messages = &seen[1].messages;
        assert_eq!(messages[0].role, TurnRole::System);
        assert_eq!(messages[1].role, TurnRole::User);
        assert_eq!(messages[2].role, TurnRole::Assistant);
        assert_eq!(messages[3].role, TurnRole::User);
        assert_eq!(messages[3].content, "two");
        assert_eq!(messages.last().unwrap().content, "two");
    }

    #[tokio::test]
    async fn test_upstream_failure_keeps_user_turn_only() {
        let svc = service(CannedApi::failing_network());

        let err = svc.process_message("Hi", None).await.unwrap_err();
        assert_eq!(err.status_code(), 502);

        // The user turn persisted; no assistant turn was appended.
        let conversations = svc.repo.conversations.lock().unwrap();
        let (_, messages) = conversations.iter().next().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, Sender::User);
    }

    #[tokio::test]
    async fn test_transcript_unknown_id_is_not_found() {
        let svc = service(CannedApi::replying("ok"));
        let err = svc.transcript(&Uuid::now_v7().to_string()).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_transcript_malformed_id_is_not_found() {
        let svc = service(CannedApi::replying("ok"));
        let err = svc.transcript("garbage").await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
