//! Axum router configuration with middleware.
//!
//! All chat routes are under `/api/chat/`.
//! Middleware: CORS (restricted to the configured frontend origin), tracing,
//! per-IP rate limiting. Unknown paths get a 404 envelope rather than an
//! empty body.

use axum::http::{HeaderValue, Method};
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::error::ApiError;
use crate::http::handlers;
use crate::http::rate_limit::rate_limit_middleware;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = match state.config.allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any),
        Err(_) => {
            tracing::warn!(
                origin = %state.config.allowed_origin,
                "invalid allowed origin, falling back to permissive CORS"
            );
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(Any)
        }
    };

    let chat_routes = Router::new()
        .route("/message", axum::routing::post(handlers::chat::send_message))
        .route(
            "/conversation/{session_id}",
            get(handlers::chat::get_conversation),
        );

    Router::new()
        .nest("/api/chat", chat_routes)
        .route("/health", get(health_check))
        .fallback(route_not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - liveness probe.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "success",
        "message": "Server is running",
    }))
}

/// Fallback for unmatched routes.
async fn route_not_found() -> ApiError {
    ApiError::route_not_found()
}
