use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::search::service::{collection_stats, CollectionStats};
use crate::state::AppState;

/// GET /
/// Liveness payload with service version and feature list.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "AI-Powered Job Search API with LLM is running",
        "version": env!("CARGO_PKG_VERSION"),
        "features": ["llm_query_parsing", "ai_result_analysis", "smart_filtering"]
    }))
}

/// GET /health
/// Round-trips the search store. Never fails; problems show up as `unhealthy`.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let llm_available = !state.config.openai_api_key.trim().is_empty();
    match state.store.retrieve_collection().await {
        Ok(collection) => Json(json!({
            "status": "healthy",
            "typesense_connection": "ok",
            "collection": state.store.collection_name(),
            "total_documents": collection.num_documents,
            "llm_available": llm_available
        })),
        Err(e) => Json(json!({
            "status": "unhealthy",
            "typesense_connection": "error",
            "error": e.to_string(),
            "llm_available": llm_available
        })),
    }
}

/// GET /stats
pub async fn stats_handler(
    State(state): State<AppState>,
) -> Result<Json<CollectionStats>, AppError> {
    Ok(Json(collection_stats(state.store.as_ref()).await?))
}
