//! Chat assistant — free-form replies for job seekers.
//!
//! Messages with search intent pull the top store hits into the prompt; an
//! optional job context is prepended. History is forwarded as-is.

pub mod handlers;
pub mod prompts;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::{ChatCompletion, ChatMessage, FallbackReason, LlmOutcome};
use crate::search::translator::QUERY_BY;
use crate::store::{SearchParams, SearchStore};
use prompts::{
    CHAT_FALLBACK_REPLY, CHAT_SYSTEM, CHAT_TEMPERATURE, CONTEXT_DESCRIPTION_CHARS,
    SEARCH_CONTEXT_HITS, SEARCH_INTENT_KEYWORDS,
};

/// Job the user is currently looking at, sent by the client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobContext {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: Option<String>,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    #[serde(default)]
    pub context: Option<JobContext>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// True when the message reads like a request to look up jobs.
pub fn has_search_intent(message: &str) -> bool {
    let lower = message.to_lowercase();
    SEARCH_INTENT_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn job_context_block(context: &JobContext) -> String {
    format!(
        "Job Context:\nTitle: {}\nCompany: {}\nLocation: {}\nSalary: {}\nDescription: {}\n\n",
        context.title,
        context.company,
        context.location,
        context.salary.as_deref().unwrap_or("N/A"),
        context.description
    )
}

/// Numbered one-line summaries of the top hits for `message`.
async fn search_context_block(
    store: &dyn SearchStore,
    message: &str,
) -> Result<String, AppError> {
    let params = SearchParams {
        q: message.to_string(),
        query_by: Some(QUERY_BY.to_string()),
        per_page: Some(SEARCH_CONTEXT_HITS),
        ..SearchParams::default()
    };
    let results = store
        .search(&params)
        .await
        .map_err(|e| AppError::store("Chat search failed", e))?;

    let field = |doc: &serde_json::Value, key: &str| {
        doc.get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };
    let lines: Vec<String> = results
        .hits
        .iter()
        .enumerate()
        .map(|(i, hit)| {
            let doc = &hit.document;
            format!(
                "{}. {} at {} in {}: {}...",
                i + 1,
                field(doc, "title"),
                field(doc, "company"),
                field(doc, "location"),
                truncate(&field(doc, "description"), CONTEXT_DESCRIPTION_CHARS)
            )
        })
        .collect();

    Ok(format!(
        "Here are some job listings found for the user's query:\n{}\n\n",
        lines.join("\n")
    ))
}

/// Builds the full message list: system prompt, history, then the user turn.
pub fn build_messages(
    request: &ChatRequest,
    search_context: Option<&str>,
) -> Vec<ChatMessage> {
    let mut user_content = String::new();
    if let Some(context) = &request.context {
        user_content.push_str(&job_context_block(context));
    }
    if let Some(search_context) = search_context {
        user_content.push_str(search_context);
    }
    user_content.push_str(&request.message);

    let mut messages = Vec::with_capacity(request.history.len() + 2);
    messages.push(ChatMessage::system(CHAT_SYSTEM));
    messages.extend(request.history.iter().cloned());
    messages.push(ChatMessage::user(user_content));
    messages
}

/// Produces the assistant reply. Store failures are errors; LLM failures
/// yield a fixed apology.
pub async fn reply(
    store: &dyn SearchStore,
    llm: &dyn ChatCompletion,
    request: &ChatRequest,
) -> Result<LlmOutcome<String>, AppError> {
    let search_context = if has_search_intent(&request.message) {
        Some(search_context_block(store, &request.message).await?)
    } else {
        None
    };

    let messages = build_messages(request, search_context.as_deref());
    Ok(match llm.complete(&messages, CHAT_TEMPERATURE).await {
        Ok(text) => LlmOutcome::Completed(text),
        Err(e) => {
            warn!("Chat completion failed: {e}");
            LlmOutcome::Fallback {
                value: CHAT_FALLBACK_REPLY.to_string(),
                reason: FallbackReason::from(&e),
            }
        }
    })
}
