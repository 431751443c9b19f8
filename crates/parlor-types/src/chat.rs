//! Conversation and message types for Parlor.
//!
//! A conversation is a durable grouping of ordered messages under one id.
//! Messages are immutable once created; the transcript order is ascending
//! `created_at` (ids are UUID v7, so they tiebreak in time order).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Who authored a stored message.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (sender IN ('user', 'assistant'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "assistant" => Ok(Sender::Assistant),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// A durable conversation record.
///
/// Conversations own an ordered sequence of messages. They are created when
/// a chat request arrives without a resolvable session id, and are never
/// mutated afterwards except by appending messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
}

impl Conversation {
    /// Allocate a fresh conversation with a time-sortable id.
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            started_at: Utc::now(),
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// A single immutable message within a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender: Sender,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl StoredMessage {
    /// Build a new message for `conversation_id` with a server-assigned
    /// timestamp.
    pub fn new(conversation_id: Uuid, sender: Sender, text: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            conversation_id,
            sender,
            text,
            created_at: Utc::now(),
        }
    }
}

/// The result of processing one chat turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub reply: String,
    pub session_id: Uuid,
}
