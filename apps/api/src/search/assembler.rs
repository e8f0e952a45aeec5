//! Result Assembler — raw hits → typed jobs → response envelope.

use tracing::warn;

use crate::llm_client::ChatCompletion;
use crate::search::analyzer::{analyze_jobs, enhance_job};
use crate::search::models::{EnrichedJob, Job, ParsedQuery, ResponseEnvelope};
use crate::store::SearchHit;

/// Coerces each hit into a `Job`, skipping (and logging) the ones that don't fit.
pub fn coerce_hits(hits: Vec<SearchHit>) -> Vec<Job> {
    hits.into_iter()
        .filter_map(|hit| {
            let job_id = hit.document.get("job_id").cloned();
            serde_json::from_value::<Job>(hit.document)
                .inspect_err(|e| warn!("Skipping job {:?}: {e}", job_id))
                .ok()
        })
        .collect()
}

pub fn search_summary(count: usize, query: &str) -> String {
    format!("Found {count} jobs matching '{query}'")
}

/// Builds the AI-search response. With `enhance`, each job gets insights
/// and, if any job survived coercion, the envelope gets an aggregate analysis.
pub async fn assemble(
    llm: &dyn ChatCompletion,
    hits: Vec<SearchHit>,
    query: &str,
    parsed: ParsedQuery,
    enhance: bool,
) -> ResponseEnvelope {
    let mut jobs = Vec::new();
    for job in coerce_hits(hits) {
        let ai_insights = if enhance {
            Some(enhance_job(llm, &job, query).await.into_value())
        } else {
            None
        };
        jobs.push(EnrichedJob { job, ai_insights });
    }

    let ai_analysis = if enhance && !jobs.is_empty() {
        let refs: Vec<&Job> = jobs.iter().map(|j| &j.job).collect();
        Some(analyze_jobs(llm, &refs, query).await.into_value())
    } else {
        None
    };

    ResponseEnvelope {
        query: query.to_string(),
        llm_parsing: parsed,
        total_results: jobs.len(),
        search_summary: search_summary(jobs.len(), query),
        jobs,
        ai_analysis,
    }
}
