//! v1 API endpoints

pub mod conversations;
pub mod form_data;

use axum::{routing::post, Router};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route(
            "/conversations/{conversation_id}/messages",
            post(conversations::send_message),
        )
        .route("/form-data/extract", post(form_data::extract_form_data))
}
