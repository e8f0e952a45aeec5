//! Query Parser — natural-language query → `ParsedQuery` via the LLM.
//!
//! Falls back to a whitespace keyword split whenever the LLM is unavailable
//! or answers with something that is not a parsed-query object.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::llm_client::prompts::json_system;
use crate::llm_client::{call_json_or, ChatCompletion, ChatMessage, LlmOutcome};
use crate::search::models::ParsedQuery;
use crate::search::prompts::{
    QUERY_PARSE_PROMPT_TEMPLATE, QUERY_PARSE_ROLE, QUERY_PARSE_TEMPERATURE,
};

/// Deterministic parse: every whitespace-separated word is a keyword and the
/// raw query is the search string.
pub fn fallback_parse(query: &str) -> ParsedQuery {
    ParsedQuery {
        keywords: query.split_whitespace().map(String::from).collect(),
        search_query: Some(query.to_string()),
        ..ParsedQuery::default()
    }
}

/// The model's reply must be a JSON object; arrays and scalars are unparsable.
/// Inside the object each key is read leniently (see `ParsedQuery`).
#[derive(Deserialize)]
#[serde(try_from = "Map<String, Value>")]
struct ParsedReply(ParsedQuery);

impl TryFrom<Map<String, Value>> for ParsedReply {
    type Error = serde_json::Error;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        serde_json::from_value(Value::Object(object)).map(ParsedReply)
    }
}

pub async fn parse_query(llm: &dyn ChatCompletion, query: &str) -> LlmOutcome<ParsedQuery> {
    let messages = [
        ChatMessage::system(json_system(QUERY_PARSE_ROLE)),
        ChatMessage::user(QUERY_PARSE_PROMPT_TEMPLATE.replace("{user_query}", query)),
    ];
    call_json_or(llm, &messages, QUERY_PARSE_TEMPERATURE, || {
        ParsedReply(fallback_parse(query))
    })
    .await
    .map(|ParsedReply(parsed)| parsed)
}
