//! Job search orchestration.
//!
//! Flow (AI path): parse_query → build_search_params → store.search →
//!                 assemble (optional per-job insights + aggregate analysis).

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::ChatCompletion;
use crate::search::assembler::{assemble, coerce_hits};
use crate::search::models::{Job, ResponseEnvelope};
use crate::search::parser::parse_query;
use crate::search::translator::{build_search_params, build_traditional_params, TraditionalQuery};
use crate::store::SearchStore;

#[derive(Debug, Serialize)]
pub struct CollectionStats {
    pub collection_name: String,
    pub total_documents: u64,
    pub fields: Vec<String>,
}

/// LLM-assisted search. LLM problems degrade to fallbacks; store problems
/// are errors.
pub async fn ai_search(
    store: &dyn SearchStore,
    llm: &dyn ChatCompletion,
    query: &str,
    limit: u32,
    enhance: bool,
) -> Result<ResponseEnvelope, AppError> {
    let parsed = parse_query(llm, query).await;
    if let Some(reason) = parsed.fallback_reason() {
        info!("Query parsed with keyword fallback ({reason:?})");
    }
    let parsed = parsed.into_value();

    let params = build_search_params(&parsed, limit);
    let results = store
        .search(&params)
        .await
        .map_err(|e| AppError::store("AI search failed", e))?;
    info!(
        "AI search '{}': {} hits of {} matches",
        query,
        results.hits.len(),
        results.found
    );

    Ok(assemble(llm, results.hits, query, parsed, enhance).await)
}

/// Keyword + exact-facet search without the LLM.
pub async fn traditional_search(
    store: &dyn SearchStore,
    query: &TraditionalQuery,
) -> Result<Vec<Job>, AppError> {
    let params = build_traditional_params(query);
    let results = store
        .search(&params)
        .await
        .map_err(|e| AppError::store("Search failed", e))?;
    Ok(coerce_hits(results.hits))
}

/// Any lookup failure, including a malformed stored document, reads as not found.
pub async fn get_job(store: &dyn SearchStore, job_id: i64) -> Result<Job, AppError> {
    let not_found = || AppError::NotFound(format!("Job with ID {job_id} not found"));
    let document = store
        .get_document(&job_id.to_string())
        .await
        .map_err(|_| not_found())?;
    serde_json::from_value(document).map_err(|_| not_found())
}

pub async fn collection_stats(store: &dyn SearchStore) -> Result<CollectionStats, AppError> {
    let collection = store
        .retrieve_collection()
        .await
        .map_err(|e| AppError::store("Failed to get stats", e))?;
    Ok(CollectionStats {
        collection_name: store.collection_name().to_string(),
        total_documents: collection.num_documents,
        fields: collection.field_names(),
    })
}
