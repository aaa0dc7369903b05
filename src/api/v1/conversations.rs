//! Conversational turn endpoint

use axum::extract::{Path, State};
use tracing::info;
use validator::Validate;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, SendMessageRequest};
use crate::domain::AiResponse;

/// POST /v1/conversations/{conversation_id}/messages
pub async fn send_message(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<AiResponse>, ApiError> {
    if conversation_id.trim().is_empty() {
        return Err(
            ApiError::bad_request("conversation_id must not be empty").with_param("conversation_id")
        );
    }

    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    info!(
        conversation_id = %conversation_id,
        language = %request.language,
        history_turns = request.history.len(),
        "Processing conversation message"
    );

    let response = state
        .orchestrator
        .process_message(
            &conversation_id,
            &request.message,
            &request.language,
            &request.history,
        )
        .await?;

    Ok(Json(response))
}
