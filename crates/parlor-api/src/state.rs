//! Application state wiring all services together.
//!
//! ChatService is generic over repository/provider traits; AppState pins it
//! to the concrete infra implementations.

use std::sync::Arc;

use parlor_core::chat::service::ChatService;
use parlor_core::reply::generator::ReplyGenerator;
use parlor_infra::llm::groq::GroqClient;
use parlor_infra::sqlite::conversation::SqliteConversationRepository;
use parlor_infra::sqlite::pool::{resolve_data_dir, DatabasePool};
use parlor_types::config::AppConfig;

use crate::http::rate_limit::RateLimiter;

/// Concrete service type pinned to the infra implementations.
pub type ConcreteChatService = ChatService<SqliteConversationRepository, GroqClient>;

/// Shared application state for the HTTP handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub rate_limiter: Arc<RateLimiter>,
    pub config: AppConfig,
}

impl AppState {
    /// Initialize the application state: connect to the database, wire services.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_url = format!("sqlite://{}?mode=rwc", data_dir.join("parlor.db").display());
        let db_pool = DatabasePool::new(&db_url).await?;

        let repo = SqliteConversationRepository::new(db_pool);
        let client = GroqClient::new(config.api_key.clone());
        let generator = ReplyGenerator::new(client, config.clone());
        let chat_service = ChatService::new(repo, generator);

        // The limiter is a no-op outside production so local testing is not
        // throttled.
        let rate_limiter = RateLimiter::new(
            config.rate_limit_window,
            config.rate_limit_max_requests,
            config.is_production(),
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            rate_limiter: Arc::new(rate_limiter),
            config,
        })
    }
}
