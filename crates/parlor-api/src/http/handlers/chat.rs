//! Chat HTTP handlers.
//!
//! - POST /api/chat/message             - process one chat turn
//! - GET  /api/chat/conversation/{sessionId} - full transcript
//!
//! The request body is validated field-by-field over raw JSON (rather than a
//! typed extractor) so that validation failures come back as a single 400
//! with concatenated messages, and a non-string sessionId is reported rather
//! than rejected by deserialization.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::http::error::ApiError;
use crate::state::AppState;

/// Fixed 400 message for bodies the JSON extractor rejects.
const INVALID_JSON_BODY: &str = "Invalid JSON in request body";

/// POST /api/chat/message - process a chat message.
///
/// The body arrives as a `Result` so an unparseable payload (or wrong
/// Content-Type) still comes back in the error envelope instead of the
/// extractor's plain-text rejection.
pub async fn send_message(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body.map_err(invalid_body)?;
    let (message, session_id) =
        validate_send_message(&body, state.config.max_message_length)?;

    let result = state
        .chat_service
        .process_message(&message, session_id.as_deref())
        .await?;

    Ok(Json(json!({
        "status": "success",
        "data": result,
    })))
}

/// GET /api/chat/conversation/{sessionId} - full transcript, ascending.
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let transcript = state.chat_service.transcript(&session_id).await?;

    // transcript() only succeeds for a parseable, existing id.
    let canonical = Uuid::parse_str(session_id.trim())
        .map(|id| id.to_string())
        .map_err(|_| ApiError::from(parlor_types::error::ChatError::ConversationNotFound))?;

    let messages: Vec<Value> = transcript
        .iter()
        .map(|msg| {
            json!({
                "sender": msg.sender,
                "text": msg.text,
                "timestamp": msg.created_at,
            })
        })
        .collect();

    Ok(Json(json!({
        "status": "success",
        "data": {
            "sessionId": canonical,
            "messages": messages,
        },
    })))
}

/// Map a body rejection to a 400 with a fixed message; the extractor's own
/// text carries parser internals that must not reach callers.
fn invalid_body(_: JsonRejection) -> ApiError {
    ApiError::validation(INVALID_JSON_BODY)
}

/// Validate the send-message body before any side effect.
///
/// Returns the trimmed message and the optional session id; failures are
/// joined with ", " into one 400 message. Empty or null sessionId counts as
/// absent.
fn validate_send_message(
    body: &Value,
    max_length: usize,
) -> Result<(String, Option<String>), ApiError> {
    let mut errors: Vec<String> = Vec::new();

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or("");

    if message.is_empty() {
        errors.push("Message cannot be empty".to_string());
    } else if message.chars().count() > max_length {
        errors.push(format!("Message cannot exceed {max_length} characters"));
    }

    let session_id = match body.get("sessionId") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push("Session ID must be a string".to_string());
            None
        }
    };

    if !errors.is_empty() {
        return Err(ApiError::validation(errors.join(", ")));
    }

    Ok((message.to_string(), session_id))
}
