// LLM prompt templates for the search pipeline.

/// Role for query parsing. Combined with the JSON-only rule.
pub const QUERY_PARSE_ROLE: &str = "You are a job search query parser.";

pub const QUERY_PARSE_TEMPERATURE: f32 = 0.1;

/// Query parsing prompt. Replace `{user_query}` before sending.
pub const QUERY_PARSE_PROMPT_TEMPLATE: &str = r#"Parse this job search query and extract structured information for a search engine.

User Query: "{user_query}"

Return a JSON object with this schema:
{
  "keywords": ["list", "of", "key", "terms"],
  "location": "city, state, or country if mentioned",
  "salary_expectation": "low" | "medium" | "high",
  "work_arrangement": "remote" | "onsite" | "hybrid",
  "experience_level": "entry" | "mid" | "senior",
  "search_query": "optimized search string for the search engine",
  "filters": {
    "location": "remote" | "onsite",
    "experience_level": "senior" | "junior"
  },
  "sort_by": "relevance" | "salary" | "date" | "company"
}

Only include fields that are relevant. Use null for anything not mentioned.
`search_query` should hold the role and skill terms only, without location,
seniority or salary words already captured in `filters`."#;

pub const JOB_INSIGHT_ROLE: &str = "You are a job matching assistant. Analyze job relevance.";

pub const JOB_INSIGHT_TEMPERATURE: f32 = 0.2;

/// Max description characters sent per job.
pub const JOB_INSIGHT_DESCRIPTION_CHARS: usize = 500;

/// Per-job insight prompt.
/// Replace: {query}, {title}, {company}, {location}, {description}
pub const JOB_INSIGHT_PROMPT_TEMPLATE: &str = r#"Analyze this job posting for relevance to the query: "{query}"

Job: {title} at {company} in {location}
Description: {description}...

Return a JSON object:
{
  "relevance_score": "high" | "medium" | "low",
  "key_highlights": ["highlight1", "highlight2"],
  "why_good_match": "explanation",
  "potential_concerns": ["concern1", "concern2"]
}"#;

pub const ANALYSIS_ROLE: &str =
    "You are a job market analyst. Provide helpful insights about job search results.";

pub const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// Number of top results summarized for the aggregate analysis.
pub const ANALYSIS_TOP_N: usize = 10;

/// Aggregate analysis prompt. Replace: {query}, {job_summaries}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze these job search results for the query: "{query}"

Jobs found:
{job_summaries}

Return a JSON object:
{
  "summary": "Brief summary of what was found",
  "insights": [
    "Key insight about the job market",
    "Another insight about opportunities"
  ],
  "recommendations": [
    "Recommendation for the job seeker",
    "Another recommendation"
  ],
  "salary_trends": "Any salary insights if available",
  "skill_demand": "Most in-demand skills from these jobs"
}"#;
