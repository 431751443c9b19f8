//! Infrastructure implementations for Parlor.
//!
//! SQLite persistence (sqlx, split reader/writer WAL pool), the Groq
//! completion client (reqwest), and environment configuration loading.

pub mod config;
pub mod llm;
pub mod sqlite;
