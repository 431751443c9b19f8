//! Conversation store contract and chat orchestration.

pub mod repository;
pub mod service;
