//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::search::models::{Job, ResponseEnvelope};
use crate::search::service::{ai_search, get_job, traditional_search};
use crate::search::translator::TraditionalQuery;
use crate::state::AppState;

const AI_SEARCH_MAX_LIMIT: i64 = 50;
const TRADITIONAL_MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct AiSearchParams {
    pub query: String,
    #[serde(default = "default_ai_limit")]
    pub limit: i64,
    #[serde(default = "default_enhance")]
    pub enhance: bool,
}

fn default_ai_limit() -> i64 {
    10
}

fn default_enhance() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ListJobsParams {
    pub q: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_list_limit() -> i64 {
    20
}

/// Clamps a caller-supplied limit into `[1, max]`.
fn clamp_limit(limit: i64, max: i64) -> u32 {
    limit.clamp(1, max) as u32
}

/// GET /jobs/ai-search
///
/// Natural-language search: LLM parse → store search → optional enrichment.
pub async fn handle_ai_search(
    State(state): State<AppState>,
    Query(params): Query<AiSearchParams>,
) -> Result<Json<ResponseEnvelope>, AppError> {
    let limit = clamp_limit(params.limit, AI_SEARCH_MAX_LIMIT);
    let envelope = ai_search(
        state.store.as_ref(),
        state.llm.as_ref(),
        &params.query,
        limit,
        params.enhance,
    )
    .await?;
    Ok(Json(envelope))
}

/// GET /jobs
///
/// Traditional search with exact company/location filters. No LLM involved.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<ListJobsParams>,
) -> Result<Json<Vec<Job>>, AppError> {
    let query = TraditionalQuery {
        q: params.q,
        company: params.company,
        location: params.location,
        limit: clamp_limit(params.limit, TRADITIONAL_MAX_LIMIT),
        offset: params.offset.clamp(0, i64::from(u32::MAX)) as u32,
    };
    Ok(Json(traditional_search(state.store.as_ref(), &query).await?))
}

/// GET /jobs/:job_id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<Json<Job>, AppError> {
    Ok(Json(get_job(state.store.as_ref(), job_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit_bounds() {
        assert_eq!(clamp_limit(0, AI_SEARCH_MAX_LIMIT), 1);
        assert_eq!(clamp_limit(-5, AI_SEARCH_MAX_LIMIT), 1);
        assert_eq!(clamp_limit(25, AI_SEARCH_MAX_LIMIT), 25);
        assert_eq!(clamp_limit(500, AI_SEARCH_MAX_LIMIT), 50);
        assert_eq!(clamp_limit(500, TRADITIONAL_MAX_LIMIT), 100);
    }
}
