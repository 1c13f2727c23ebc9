pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_end_session),
        )
        // Actions
        .route(
            "/api/v1/sessions/:id/resume",
            post(handlers::handle_upload_resume),
        )
        .route(
            "/api/v1/sessions/:id/analyze",
            post(handlers::handle_analyze_job),
        )
        .route(
            "/api/v1/sessions/:id/cover-letter",
            post(handlers::handle_generate_cover_letter).put(handlers::handle_edit_cover_letter),
        )
        .route(
            "/api/v1/sessions/:id/language",
            post(handlers::handle_switch_language),
        )
        // Downloads
        .route(
            "/api/v1/sessions/:id/downloads/analysis",
            get(handlers::handle_download_analysis),
        )
        .route(
            "/api/v1/sessions/:id/downloads/cover-letter/:lang",
            post(handlers::handle_download_cover_letter),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
