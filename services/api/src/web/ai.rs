//! services/api/src/web/ai.rs
//!
//! The AI assistant proxy. Failures from the provider are never surfaced
//! raw: callers always receive assistant text, even when that text is a
//! static apology. The chat history endpoints report errors precisely.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::state::AppState;
use fixit_core::domain::{ChatMessage, ChatRole, ChatTurn};
use fixit_core::CoreError;

/// Reply used when no API key is configured.
const OFFLINE_REPLY: &str =
    "I'm currently offline. Please configure the AI service and try again later.";

/// Reply substituted for any downstream failure.
const UNAVAILABLE_REPLY: &str =
    "Sorry, I am currently offline or experiencing high traffic. Please try again later.";

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AiRequest {
    pub prompt: String,
    #[serde(default)]
    pub history: Vec<TurnPayload>,
    pub session_id: Option<String>,
}

/// One prior conversation turn as the client sends it.
#[derive(Deserialize, ToSchema)]
pub struct TurnPayload {
    /// "user" or "model".
    pub role: String,
    pub text: String,
}

impl TurnPayload {
    fn to_turn(&self) -> Result<ChatTurn, CoreError> {
        let role = match self.role.as_str() {
            "user" => ChatRole::User,
            "model" => ChatRole::Model,
            other => {
                return Err(CoreError::Validation(format!(
                    "history role must be 'user' or 'model', got '{other}'"
                )))
            }
        };
        Ok(ChatTurn {
            role,
            text: self.text.clone(),
        })
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AiResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Deserialize)]
pub struct HistoryParams {
    pub limit: Option<usize>,
}

/// Ask the assistant one question, with optional history persistence.
#[utoipa::path(
    post,
    path = "/api/ai",
    request_body = AiRequest,
    responses(
        (status = 200, description = "Assistant reply (friendly fallback text on provider failure)", body = AiResponse),
        (status = 400, description = "Missing prompt or malformed history"),
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AiRequest>,
) -> Result<Json<AiResponse>, ApiError> {
    if request.prompt.trim().is_empty() {
        return Err(CoreError::Validation("prompt is required".to_string()).into());
    }
    let history = request
        .history
        .iter()
        .map(TurnPayload::to_turn)
        .collect::<Result<Vec<_>, _>>()?;

    let Some(assistant) = &state.assistant else {
        warn!("assistant requested but no API key is configured");
        return Ok(Json(AiResponse {
            text: OFFLINE_REPLY.to_string(),
            session_id: request.session_id,
        }));
    };

    // Any downstream failure (generation or persistence) is masked with a
    // static message; a raw provider error never reaches the caller.
    let text = match assistant.generate(&history, &request.prompt).await {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, "assistant generation failed, substituting fallback reply");
            return Ok(Json(AiResponse {
                text: UNAVAILABLE_REPLY.to_string(),
                session_id: request.session_id,
            }));
        }
    };

    if let Some(session_id) = &request.session_id {
        let persisted = async {
            state
                .chat
                .add_message(session_id, ChatRole::User, &request.prompt)
                .await?;
            state
                .chat
                .add_message(session_id, ChatRole::Model, &text)
                .await
        }
        .await;
        if let Err(err) = persisted {
            warn!(error = %err, session_id, "failed to persist chat turn");
        }
    }

    debug!(
        prompt_len = request.prompt.len(),
        reply_len = text.len(),
        "assistant reply generated"
    );
    Ok(Json(AiResponse {
        text,
        session_id: request.session_id,
    }))
}

pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let limit = params
        .limit
        .unwrap_or(fixit_core::repos::chat::DEFAULT_HISTORY_LIMIT);
    Ok(Json(state.chat.history(&session_id, limit).await?))
}

pub async fn clear_history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.chat.clear(&session_id).await?;
    Ok(Json(serde_json::json!({ "message": "Chat history cleared" })))
}
