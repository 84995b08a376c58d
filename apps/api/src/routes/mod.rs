pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::assistant::handlers::handle_assistant;
use crate::matching::handlers;
use crate::skills::handlers::handle_extract_skills;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Match API
        .route("/api/v1/match", post(handlers::handle_match))
        .route("/api/v1/match/batch", post(handlers::handle_match_batch))
        .route("/api/v1/cache/stats", get(handlers::handle_cache_stats))
        .route("/api/v1/cache", delete(handlers::handle_cache_clear))
        // Skills API
        .route("/api/v1/skills/extract", post(handle_extract_skills))
        // Assistant API
        .route("/api/v1/assistant", post(handle_assistant))
        .with_state(state)
}
