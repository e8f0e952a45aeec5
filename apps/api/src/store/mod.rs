//! Search store — the black-box document engine behind every job query.
//!
//! `SearchStore` is the seam: production uses `TypesenseClient`, tests use
//! `MockStore`. One instance lives in `AppState` for the whole process.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub mod schema;
pub mod typesense;

#[cfg(test)]
pub mod mock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

/// Engine-native search request. `None` fields are omitted from the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub found: u64,
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub document: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub facet: bool,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionSchema {
    pub name: String,
    pub fields: Vec<FieldSchema>,
    pub default_sorting_field: String,
}

/// Collection metadata as reported by the engine. Unknown keys are kept in
/// `extra` so debug output shows everything the engine returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    #[serde(default)]
    pub num_documents: u64,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl CollectionInfo {
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }
}

/// Per-document result line of a bulk import.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImportLineResult {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Name of the jobs collection this store reads and writes.
    fn collection_name(&self) -> &str;

    async fn retrieve_collection(&self) -> Result<CollectionInfo>;

    async fn create_collection(&self, schema: &CollectionSchema) -> Result<CollectionInfo>;

    async fn delete_collection(&self) -> Result<()>;

    async fn list_collections(&self) -> Result<Vec<CollectionInfo>>;

    async fn search(&self, params: &SearchParams) -> Result<SearchResponse>;

    /// Fetches one document by engine id. Missing documents are `NotFound`.
    async fn get_document(&self, id: &str) -> Result<Value>;

    /// Bulk-writes JSON Lines in upsert mode; one result per input line.
    async fn upsert_documents(&self, jsonl: String) -> Result<Vec<ImportLineResult>>;
}
