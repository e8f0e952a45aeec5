//! Administrative endpoints.
//!
//! Every failure is reported as `{"error": ...}` with status 200.

use std::path::Path;

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::info;

use crate::search::importer::{import_file, setup_collection, ImportReport};
use crate::state::AppState;

fn import_summary(report: &ImportReport) -> Value {
    json!({
        "total_documents": report.total_documents,
        "batches_attempted": report.attempted(),
        "batches_succeeded": report.succeeded(),
        "batches_failed": report.failed(),
        "batches": report.batches,
    })
}

/// GET /admin/import-data
pub async fn import_data_handler(State(state): State<AppState>) -> Json<Value> {
    let path = Path::new(&state.config.data_file);
    match import_file(state.store.as_ref(), path, &state.config.columns).await {
        Ok(report) => Json(json!({
            "message": "Data import completed successfully",
            "import": import_summary(&report),
        })),
        Err(e) => Json(json!({
            "message": "Data import failed",
            "error": e.to_string(),
        })),
    }
}

/// GET /admin/reset-collection
/// Deletes the collection, then recreates and re-imports it.
pub async fn reset_collection_handler(State(state): State<AppState>) -> Json<Value> {
    if let Err(e) = state.store.delete_collection().await {
        return Json(json!({ "error": e.to_string() }));
    }
    info!("Deleted collection '{}'", state.store.collection_name());

    let path = Path::new(&state.config.data_file);
    match setup_collection(state.store.as_ref(), path, &state.config.columns).await {
        Ok(outcome) => Json(json!({
            "message": "Collection reset and data imported successfully",
            "setup": outcome,
        })),
        Err(e) => Json(json!({
            "message": "Collection reset failed",
            "error": e.to_string(),
        })),
    }
}

/// GET /admin/debug-collection
pub async fn debug_collection_handler(State(state): State<AppState>) -> Json<Value> {
    let collection = match state.store.retrieve_collection().await {
        Ok(c) => c,
        Err(e) => {
            return Json(json!({
                "collection_exists": false,
                "error": e.to_string(),
            }))
        }
    };

    let sample = crate::store::SearchParams {
        q: "*".to_string(),
        per_page: Some(1),
        ..Default::default()
    };
    let (sample_search_count, sample_error) = match state.store.search(&sample).await {
        Ok(results) => (results.hits.len(), None),
        Err(e) => (0, Some(e.to_string())),
    };

    let mut body = json!({
        "collection_exists": true,
        "collection_info": collection,
        "sample_search_count": sample_search_count,
        "total_documents": collection.num_documents,
        "fields": collection.field_names(),
    });
    if let Some(err) = sample_error {
        body["sample_error"] = json!(err);
    }
    Json(body)
}

/// GET /admin/list-collections
pub async fn list_collections_handler(State(state): State<AppState>) -> Json<Value> {
    match state.store.list_collections().await {
        Ok(collections) => Json(json!({
            "collections": collections.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            "total_collections": collections.len(),
        })),
        Err(e) => Json(json!({ "error": e.to_string() })),
    }
}
