pub mod health;
pub mod pages;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::documents::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(pages::welcome_page))
        .route("/document_analyzer", get(pages::document_analyzer_page))
        .route("/query", get(pages::query_page))
        .route("/health", get(health::health_handler))
        .route(
            "/analyze_documents",
            post(handlers::handle_analyze_documents),
        )
        .route("/query_document", post(handlers::handle_query_document))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
