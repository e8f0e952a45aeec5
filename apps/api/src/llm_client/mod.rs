/// LLM Client — the single point of entry for all chat-completion calls.
///
/// ARCHITECTURAL RULE: No other module may call the completion API directly.
/// All LLM interactions go through the `ChatCompletion` trait so that the
/// process-wide client can be swapped for a fake in tests.
///
/// Calls are attempted exactly once. Callers that must never fail turn errors
/// into an `LlmOutcome::Fallback` via `call_json_or`.
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

#[cfg(test)]
pub mod mock;

const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Unrecognized roles coming in from clients are read as `user`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        match role.trim().to_lowercase().as_str() {
            "system" => Role::System,
            "assistant" => Role::Assistant,
            _ => Role::User,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Chat-completion backend. Returns the text of the first choice.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage], temperature: f32)
        -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Typed outcome for calls that degrade instead of failing
// ────────────────────────────────────────────────────────────────────────────

/// Why a fallback value was used instead of the model's answer.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// The request did not complete (network, auth, 5xx, rate limit).
    Unavailable(String),
    /// The model answered, but not with the JSON shape we asked for.
    Unparsable(String),
}

impl From<&LlmError> for FallbackReason {
    fn from(e: &LlmError) -> Self {
        match e {
            LlmError::Parse(_) | LlmError::EmptyContent => FallbackReason::Unparsable(e.to_string()),
            LlmError::Http(_) | LlmError::Api { .. } => FallbackReason::Unavailable(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LlmOutcome<T> {
    Completed(T),
    Fallback { value: T, reason: FallbackReason },
}

impl<T> LlmOutcome<T> {
    pub fn into_value(self) -> T {
        match self {
            LlmOutcome::Completed(value) | LlmOutcome::Fallback { value, .. } => value,
        }
    }

    #[cfg(test)]
    pub fn value(&self) -> &T {
        match self {
            LlmOutcome::Completed(value) | LlmOutcome::Fallback { value, .. } => value,
        }
    }

    #[cfg(test)]
    pub fn is_fallback(&self) -> bool {
        matches!(self, LlmOutcome::Fallback { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LlmOutcome<U> {
        match self {
            LlmOutcome::Completed(value) => LlmOutcome::Completed(f(value)),
            LlmOutcome::Fallback { value, reason } => LlmOutcome::Fallback {
                value: f(value),
                reason,
            },
        }
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            LlmOutcome::Completed(_) => None,
            LlmOutcome::Fallback { reason, .. } => Some(reason),
        }
    }
}

/// Calls the LLM and deserializes the text response as JSON.
/// The prompt must instruct the model to return valid JSON.
pub async fn call_json<T: DeserializeOwned>(
    llm: &dyn ChatCompletion,
    messages: &[ChatMessage],
    temperature: f32,
) -> Result<T, LlmError> {
    let text = llm.complete(messages, temperature).await?;
    let text = strip_json_fences(&text);
    if text.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    serde_json::from_str(text).map_err(LlmError::Parse)
}

/// Like `call_json`, but any failure yields `fallback()` tagged with the reason.
pub async fn call_json_or<T, F>(
    llm: &dyn ChatCompletion,
    messages: &[ChatMessage],
    temperature: f32,
    fallback: F,
) -> LlmOutcome<T>
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match call_json(llm, messages, temperature).await {
        Ok(value) => LlmOutcome::Completed(value),
        Err(e) => {
            let reason = FallbackReason::from(&e);
            warn!("LLM call degraded to fallback: {e}");
            LlmOutcome::Fallback {
                value: fallback(),
                reason,
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI-compatible HTTP client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The process-wide LLM client. Wraps the chat-completions endpoint.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: String, model: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatCompletion for LlmClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, LlmError> {
        let request_body = CompletionRequest {
            model: &self.model,
            messages,
            temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: CompletionResponse = response.json().await?;

        if let Some(usage) = &completion.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
