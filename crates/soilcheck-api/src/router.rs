use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Catalog
        .route("/api/v1/crops", get(handlers::list_crops))

        // Sessions
        .route("/api/v1/sessions", post(handlers::create_session))
        .route("/api/v1/sessions/{session_id}", delete(handlers::delete_session))
        .route(
            "/api/v1/sessions/{session_id}/draft",
            get(handlers::get_draft).patch(handlers::update_draft),
        )
        .route("/api/v1/sessions/{session_id}/outcome", get(handlers::get_outcome))
        .route("/api/v1/sessions/{session_id}/reset", post(handlers::reset_session))

        // Analysis
        .route("/api/v1/sessions/{session_id}/analysis/manual", post(handlers::run_manual_analysis))
        .route("/api/v1/sessions/{session_id}/analysis/image", post(handlers::run_image_analysis))

        .with_state(state)
}
