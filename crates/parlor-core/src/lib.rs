//! Business logic for Parlor.
//!
//! Contains the chat-turn processing pipeline: the conversation store
//! contract, the reply generator (provider call + response normalization),
//! and the chat orchestrator. Never depends on `parlor-infra`; all I/O goes
//! through the repository and provider traits defined here.

pub mod chat;
pub mod llm;
pub mod reply;
