pub mod admin;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat::handlers as chat;
use crate::search::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/stats", get(health::stats_handler))
        // Jobs API
        .route("/jobs", get(jobs::handle_list_jobs))
        .route("/jobs/ai-search", get(jobs::handle_ai_search))
        .route("/jobs/:job_id", get(jobs::handle_get_job))
        // Admin API
        .route("/admin/import-data", get(admin::import_data_handler))
        .route("/admin/reset-collection", get(admin::reset_collection_handler))
        .route("/admin/debug-collection", get(admin::debug_collection_handler))
        .route("/admin/list-collections", get(admin::list_collections_handler))
        // Chat API
        .route("/chat", post(chat::handle_chat))
        .route("/chat/", post(chat::handle_chat))
        .with_state(state)
}
