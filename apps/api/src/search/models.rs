use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError};

// ────────────────────────────────────────────────────────────────────────────
// Stored document
// ────────────────────────────────────────────────────────────────────────────

/// A job as written to the search store by the importer.
///
/// `id` is the engine's document key and always equals `job_id`, which makes
/// upserts overwrite in place and lets lookups go straight to the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDocument {
    pub id: String,
    pub job_id: i64,
    pub title: String,
    pub company: String,
    pub rating: Option<f64>,
    pub location: String,
    pub source: String,
    pub description: String,
    pub application_method: String,
    /// Import date (`YYYY-MM-DD`), not the original posting date.
    pub posted_date: String,
}

// ────────────────────────────────────────────────────────────────────────────
// API record
// ────────────────────────────────────────────────────────────────────────────

/// A job as returned by the API. The trailing fields are never written by the
/// importer and fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: i64,
    pub title: String,
    pub company: String,
    pub rating: Option<f64>,
    pub location: String,
    pub source: String,
    pub description: String,
    pub application_method: String,
    #[serde(default = "default_job_type")]
    pub job_type: String,
    #[serde(default = "default_experience_level")]
    pub experience_level: String,
    #[serde(default)]
    pub remote_friendly: bool,
    #[serde(default)]
    pub posted_date: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

fn default_job_type() -> String {
    "full-time".to_string()
}

fn default_experience_level() -> String {
    "mid".to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Parsed query
// ────────────────────────────────────────────────────────────────────────────

/// Facets the translator turns into filter clauses.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryFilters {
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub location: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub experience_level: Option<String>,
}

/// Structured reading of a free-text query, from the LLM or the keyword fallback.
///
/// Each key is read on its own: absent, `null` or off-type values take their
/// defaults without affecting the other keys.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedQuery {
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub keywords: Vec<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub location: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub salary_expectation: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub work_arrangement: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub experience_level: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub search_query: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub filters: QueryFilters,
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub sort_by: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Enrichment payloads
// ────────────────────────────────────────────────────────────────────────────

/// Per-job relevance notes attached under `ai_insights`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiInsights {
    pub relevance_score: String,
    pub key_highlights: Vec<String>,
    pub why_good_match: String,
    pub potential_concerns: Vec<String>,
}

/// Response-level analysis over the top results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiAnalysis {
    pub summary: String,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_trends: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_demand: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Response envelope
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedJob {
    #[serde(flatten)]
    pub job: Job,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_insights: Option<AiInsights>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub query: String,
    pub llm_parsing: ParsedQuery,
    pub total_results: usize,
    pub jobs: Vec<EnrichedJob>,
    pub search_summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<AiAnalysis>,
}
