pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::export::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Export API
        .route(
            "/api/v1/resumes/:id/export",
            get(handlers::handle_export_resume),
        )
        .route("/api/v1/resumes/render", post(handlers::handle_render_preview))
        .with_state(state)
}
