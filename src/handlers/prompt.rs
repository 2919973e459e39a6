use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::{AppState, QuotaOutcome};

#[derive(Debug, Deserialize)]
pub struct ParsePromptRequest {
    pub prompt: String,
}

/// POST /parse-prompt/ - Detect the prompt language and consume one quota unit
///
/// Returns the stock tool scaffold with the detected language:
/// `{"tool_type": "planner", "language": "hi", "config_json": {"title": "My Planner"}}`
/// or `403 {"error": "Quota exceeded"}` once the caller's counter is spent.
pub async fn parse_prompt(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<ParsePromptRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let prompt = payload.prompt.trim();
    if prompt.is_empty() {
        return Err(ApiError::bad_request("prompt is required"));
    }

    let language = state.detector.detect(prompt);

    match state.users.consume_quota(user.user_id).await? {
        QuotaOutcome::Consumed(remaining) => {
            tracing::debug!(user = %user.email, %language, remaining, "prompt parsed");
            Ok(Json(json!({
                "tool_type": "planner",
                "language": language,
                "config_json": { "title": "My Planner" },
            })))
        }
        QuotaOutcome::Exhausted => Err(ApiError::forbidden("Quota exceeded")),
        QuotaOutcome::UnknownUser => Err(ApiError::unauthorized("Unknown user")),
    }
}
