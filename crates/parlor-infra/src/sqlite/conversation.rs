//! SQLite conversation repository implementation.
//!
//! Implements `ConversationRepository` from `parlor-core` using sqlx with
//! split read/write pools: raw queries, private Row structs, reader pool for
//! SELECTs and writer pool for mutations.

use parlor_core::chat::repository::ConversationRepository;
use parlor_types::chat::{Conversation, Sender, StoredMessage};
use parlor_types::error::RepositoryError;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ConversationRepository`.
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain StoredMessage.
struct MessageRow {
    id: String,
    conversation_id: String,
    sender: String,
    text: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conversation_id: row.try_get("conversation_id")?,
            sender: row.try_get("sender")?,
            text: row.try_get("text")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<StoredMessage, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let conversation_id = Uuid::parse_str(&self.conversation_id)
            .map_err(|e| RepositoryError::Query(format!("invalid conversation_id: {e}")))?;
        let sender: Sender = self
            .sender
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(StoredMessage {
            id,
            conversation_id,
            sender,
            text: self.text,
            created_at,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| matches!(db.kind(), sqlx::error::ErrorKind::ForeignKeyViolation))
        .unwrap_or(false)
}

impl ConversationRepository for SqliteConversationRepository {
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO conversations (id, started_at) VALUES (?, ?)")
            .bind(conversation.id.to_string())
            .bind(format_datetime(&conversation.started_at))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn conversation_exists(&self, id: &Uuid) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT 1 FROM conversations WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(row.is_some())
    }

    async fn append_message(&self, message: &StoredMessage) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO messages (id, conversation_id, sender, text, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(message.conversation_id.to_string())
        .bind(message.sender.to_string())
        .bind(&message.text)
        .bind(format_datetime(&message.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                RepositoryError::NotFound
            } else {
                RepositoryError::Query(e.to_string())
            }
        })?;

        Ok(())
    }

    async fn list_messages(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Vec<StoredMessage>, RepositoryError> {
        // UUID v7 ids are time-sortable, so id breaks created_at ties.
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE conversation_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(conversation_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row =
                MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }
}
