//! Completion provider contract.

pub mod provider;
