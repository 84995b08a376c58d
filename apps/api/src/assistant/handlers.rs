//! Axum route handlers for the Assistant API.

use axum::Json;
use serde_json::Value;

use crate::assistant::intents::{respond, AssistantReply};
use crate::errors::AppError;
use crate::models::match_result::MatchResult;

/// POST /api/v1/assistant
///
/// Answers a follow-up question about the last match. Stateless: the caller
/// sends the match result along with every message.
pub async fn handle_assistant(Json(body): Json<Value>) -> Result<Json<AssistantReply>, AppError> {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            AppError::Validation("message is required and must be a string".to_string())
        })?;

    let last_match: MatchResult = match body.get("lastMatch") {
        None | Some(Value::Null) => MatchResult::default(),
        Some(raw) => serde_json::from_value(raw.clone())
            .map_err(|e| AppError::Validation(format!("lastMatch is malformed: {e}")))?,
    };

    Ok(Json(respond(message, &last_match)))
}
