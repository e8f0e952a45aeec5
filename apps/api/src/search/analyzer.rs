//! Result Analyzer — LLM annotations for search results.
//!
//! Both calls always produce a value: on failure they return a fixed
//! fallback shape, tagged with the reason in the `LlmOutcome`.

use crate::llm_client::prompts::json_system;
use crate::llm_client::{call_json_or, ChatCompletion, ChatMessage, LlmOutcome};
use crate::search::models::{AiAnalysis, AiInsights, Job};
use crate::search::prompts::{
    ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_ROLE, ANALYSIS_TEMPERATURE, ANALYSIS_TOP_N,
    JOB_INSIGHT_DESCRIPTION_CHARS, JOB_INSIGHT_PROMPT_TEMPLATE, JOB_INSIGHT_ROLE,
    JOB_INSIGHT_TEMPERATURE,
};

pub fn fallback_insights() -> AiInsights {
    AiInsights {
        relevance_score: "medium".to_string(),
        key_highlights: vec![
            "Position available".to_string(),
            "Company hiring".to_string(),
        ],
        why_good_match: "Job matches search criteria".to_string(),
        potential_concerns: vec!["Limited information available".to_string()],
    }
}

pub fn empty_analysis() -> AiAnalysis {
    AiAnalysis {
        summary: "No jobs found matching your criteria.".to_string(),
        ..AiAnalysis::default()
    }
}

pub fn fallback_analysis(job_count: usize) -> AiAnalysis {
    AiAnalysis {
        summary: format!("Found {job_count} jobs matching your search."),
        insights: vec![
            format!("Search returned {job_count} results"),
            "Consider refining your search terms for better matches".to_string(),
        ],
        recommendations: vec![
            "Review job descriptions carefully".to_string(),
            "Apply to positions that match your skills".to_string(),
        ],
        salary_trends: Some("Salary information not available in this dataset".to_string()),
        skill_demand: Some("Check job descriptions for required skills".to_string()),
    }
}

/// Relevance notes for one job against the user's query.
pub async fn enhance_job(
    llm: &dyn ChatCompletion,
    job: &Job,
    query: &str,
) -> LlmOutcome<AiInsights> {
    let description: String = job
        .description
        .chars()
        .take(JOB_INSIGHT_DESCRIPTION_CHARS)
        .collect();
    let prompt = JOB_INSIGHT_PROMPT_TEMPLATE
        .replace("{query}", query)
        .replace("{title}", or_na(&job.title))
        .replace("{company}", or_na(&job.company))
        .replace("{location}", or_na(&job.location))
        .replace("{description}", or_na(&description));

    let messages = [
        ChatMessage::system(json_system(JOB_INSIGHT_ROLE)),
        ChatMessage::user(prompt),
    ];
    call_json_or(llm, &messages, JOB_INSIGHT_TEMPERATURE, fallback_insights).await
}

/// Aggregate analysis over the first `ANALYSIS_TOP_N` jobs. An empty list
/// is answered without calling the LLM.
pub async fn analyze_jobs(
    llm: &dyn ChatCompletion,
    jobs: &[&Job],
    query: &str,
) -> LlmOutcome<AiAnalysis> {
    if jobs.is_empty() {
        return LlmOutcome::Completed(empty_analysis());
    }

    let job_summaries = jobs
        .iter()
        .take(ANALYSIS_TOP_N)
        .map(|job| {
            format!(
                "Title: {}, Company: {}, Location: {}",
                or_na(&job.title),
                or_na(&job.company),
                or_na(&job.location)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = ANALYSIS_PROMPT_TEMPLATE
        .replace("{query}", query)
        .replace("{job_summaries}", &job_summaries);
    let messages = [
        ChatMessage::system(json_system(ANALYSIS_ROLE)),
        ChatMessage::user(prompt),
    ];
    let job_count = jobs.len();
    call_json_or(llm, &messages, ANALYSIS_TEMPERATURE, || {
        fallback_analysis(job_count)
    })
    .await
}

fn or_na(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::mock::MockLlm;

    fn job(id: i64, title: &str) -> Job {
        serde_json::from_value(serde_json::json!({
            "job_id": id,
            "title": title,
            "company": "Acme",
            "rating": 4.1,
            "location": "",
            "source": "",
            "description": "x".repeat(800),
            "application_method": "online"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_enhance_job_parses_insights() {
        let llm = MockLlm::replying(vec![
            r#"{"relevance_score": "high", "key_highlights": ["Rust"],
                "why_good_match": "Exact stack", "potential_concerns": []}"#,
        ]);
        let outcome = enhance_job(&llm, &job(1, "Rust Engineer"), "rust").await;
        assert!(!outcome.is_fallback());
        assert_eq!(outcome.value().relevance_score, "high");
    }

    #[tokio::test]
    async fn test_enhance_job_truncates_description_and_fills_na() {
        let llm = MockLlm::replying(vec!["{}"]);
        enhance_job(&llm, &job(1, "Rust Engineer"), "rust").await;
        let prompt = &llm.requests()[0][1].content;
        assert!(prompt.contains(&format!("Description: {}...", "x".repeat(500))));
        assert!(!prompt.contains(&"x".repeat(501)));
        assert!(prompt.contains("at Acme in N/A"));
    }

    #[tokio::test]
    async fn test_enhance_job_failure_uses_fixed_shape() {
        let llm = MockLlm::unavailable();
        let outcome = enhance_job(&llm, &job(1, "Rust Engineer"), "rust").await;
        assert!(outcome.is_fallback());
        assert_eq!(outcome.into_value(), fallback_insights());
    }

    #[tokio::test]
    async fn test_analyze_empty_skips_llm() {
        let llm = MockLlm::replying(vec!["{}"]);
        let outcome = analyze_jobs(&llm, &[], "anything").await;
        assert_eq!(outcome.into_value(), empty_analysis());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_summarizes_top_ten_only() {
        let llm = MockLlm::replying(vec![r#"{"summary": "ok"}"#]);
        let jobs: Vec<Job> = (1..=12).map(|i| job(i, &format!("Role {i}"))).collect();
        let refs: Vec<&Job> = jobs.iter().collect();
        let outcome = analyze_jobs(&llm, &refs, "roles").await;
        assert_eq!(outcome.value().summary, "ok");

        let prompt = &llm.requests()[0][1].content;
        assert!(prompt.contains("Title: Role 10,"));
        assert!(!prompt.contains("Title: Role 11,"));
    }

    #[tokio::test]
    async fn test_analyze_failure_counts_all_jobs() {
        let llm = MockLlm::replying(vec!["not json"]);
        let jobs: Vec<Job> = (1..=3).map(|i| job(i, "Role")).collect();
        let refs: Vec<&Job> = jobs.iter().collect();
        let analysis = analyze_jobs(&llm, &refs, "roles").await.into_value();
        assert_eq!(analysis.summary, "Found 3 jobs matching your search.");
        assert_eq!(analysis.insights[0], "Search returned 3 results");
    }
}
