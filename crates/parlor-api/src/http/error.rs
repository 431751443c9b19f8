//! Application error type mapping to HTTP status codes and envelope format.
//!
//! All error responses share the shape
//! `{ "status": "error", "message": ..., "statusCode": ... }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use parlor_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Validation failure (400) with a caller-visible message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// The fixed 404 body for unmatched routes.
    pub fn route_not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "Route not found".to_string(),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "status": "error",
            "message": self.message,
            "statusCode": self.status.as_u16(),
        });

        (self.status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_mapping() {
        let err = ApiError::from(ChatError::ProviderBusy);
        assert_eq!(err.status, StatusCode::TOO_MANY_REQUESTS);

        let err = ApiError::from(ChatError::ConversationNotFound);
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Conversation not found");

        let err = ApiError::from(ChatError::UpstreamUnavailable("down".to_string()));
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_validation_is_bad_request() {
        let err = ApiError::validation("Message cannot be empty");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
