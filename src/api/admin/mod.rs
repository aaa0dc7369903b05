//! Admin API endpoints

pub mod config;

use axum::{routing::get, Router};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new().route(
        "/ai-config",
        get(config::get_ai_config).put(config::update_ai_config),
    )
}
