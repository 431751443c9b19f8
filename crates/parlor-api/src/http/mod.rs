//! HTTP surface: router, handlers, validation, rate limiting, error mapping.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod router;
