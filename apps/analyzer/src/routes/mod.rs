pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::extraction::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Browser pages
        .route("/", get(handlers::handle_index))
        .route("/analyze", post(handlers::handle_analyze_page))
        // JSON / CSV API
        .route("/api/v1/resumes/analyze", post(handlers::handle_analyze))
        .route("/api/v1/resumes/export", post(handlers::handle_export))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
