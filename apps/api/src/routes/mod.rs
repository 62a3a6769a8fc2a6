pub mod health;
pub mod templates;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::editor::handlers;
use crate::export::handlers::handle_export;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Template gallery
        .route("/api/v1/templates", get(templates::handle_list_templates))
        .route("/api/v1/templates/:id", get(templates::handle_get_template))
        // Editor sessions
        .route("/api/v1/sessions", post(handlers::handle_open_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_close_session),
        )
        .route(
            "/api/v1/sessions/:id/fields/:field",
            get(handlers::handle_get_field).put(handlers::handle_set_field),
        )
        .route(
            "/api/v1/sessions/:id/entries/:section",
            post(handlers::handle_append_entry),
        )
        .route(
            "/api/v1/sessions/:id/entries/:section/:index",
            put(handlers::handle_set_entry),
        )
        .route("/api/v1/sessions/:id/skills", put(handlers::handle_set_skills))
        .route("/api/v1/sessions/:id/preview", get(handlers::handle_preview))
        .route("/api/v1/sessions/:id/save", post(handlers::handle_save))
        // Exports
        .route("/api/v1/sessions/:id/exports/:format", post(handle_export))
        .with_state(state)
}
