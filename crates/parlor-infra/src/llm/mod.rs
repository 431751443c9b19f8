//! LLM provider clients.

pub mod groq;
