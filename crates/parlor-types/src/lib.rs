//! Shared domain types for Parlor.
//!
//! This crate holds the types common to all layers: conversations and
//! messages, LLM request shapes, the error taxonomy, and process
//! configuration. It has no I/O dependencies.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
