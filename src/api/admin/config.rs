//! AI configuration admin endpoints

use axum::extract::State;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::AiConfiguration;

/// GET /admin/ai-config
///
/// API keys are masked in the response.
pub async fn get_ai_config(
    State(state): State<AppState>,
) -> Result<Json<AiConfiguration>, ApiError> {
    let config = state.config_provider.get_active_config().await?;
    Ok(Json(config.masked()))
}

/// PUT /admin/ai-config
///
/// Replaces the configuration in place. Masked or empty API keys keep their
/// current value, so a document fetched with GET can be edited and sent back.
pub async fn update_ai_config(
    State(state): State<AppState>,
    Json(config): Json<AiConfiguration>,
) -> Result<Json<AiConfiguration>, ApiError> {
    let saved = state.config_provider.update_config(config).await?;

    info!(updated_at = %saved.updated_at(), "AI configuration replaced via admin API");

    Ok(Json(saved.masked()))
}
