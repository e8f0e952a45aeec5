//! In-memory `SearchStore` fake for tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::{
    CollectionInfo, CollectionSchema, ImportLineResult, Result, SearchHit, SearchParams,
    SearchResponse, SearchStore, StoreError,
};

#[derive(Default)]
struct Inner {
    schema: Option<CollectionSchema>,
    documents: BTreeMap<String, Value>,
    /// Canned search hits; when unset, search returns stored documents.
    hits: Option<Vec<Value>>,
    searches: Vec<SearchParams>,
    import_calls: usize,
    failing_imports: HashSet<usize>,
    fail_create: bool,
    down: bool,
}

/// Search store fake. Upserts key documents by their `id` field, so
/// re-importing the same rows overwrites instead of duplicating.
#[derive(Clone, Default)]
pub struct MockStore {
    inner: Arc<Mutex<Inner>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose collection already exists.
    pub fn with_collection() -> Self {
        let store = Self::new();
        store.inner.lock().unwrap().schema = Some(super::schema::jobs_collection_schema("jobs"));
        store
    }

    /// A store that answers every search with these documents.
    pub fn with_hits(hits: Vec<Value>) -> Self {
        let store = Self::with_collection();
        store.inner.lock().unwrap().hits = Some(hits);
        store
    }

    pub fn insert(&self, id: &str, document: Value) {
        self.inner
            .lock()
            .unwrap()
            .documents
            .insert(id.to_string(), document);
    }

    /// Every call fails as if the engine were unreachable.
    pub fn set_down(&self) {
        self.inner.lock().unwrap().down = true;
    }

    pub fn fail_create(&self) {
        self.inner.lock().unwrap().fail_create = true;
    }

    /// Makes the n-th (0-based) upsert call fail at the transport level.
    pub fn fail_import_call(&self, n: usize) {
        self.inner.lock().unwrap().failing_imports.insert(n);
    }

    pub fn documents(&self) -> BTreeMap<String, Value> {
        self.inner.lock().unwrap().documents.clone()
    }

    pub fn import_calls(&self) -> usize {
        self.inner.lock().unwrap().import_calls
    }

    pub fn searches(&self) -> Vec<SearchParams> {
        self.inner.lock().unwrap().searches.clone()
    }

    pub fn has_collection(&self) -> bool {
        self.inner.lock().unwrap().schema.is_some()
    }

    fn check_up(inner: &Inner) -> Result<()> {
        if inner.down {
            return Err(StoreError::Api {
                status: 503,
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    fn info(inner: &Inner) -> Result<CollectionInfo> {
        let schema = inner
            .schema
            .as_ref()
            .ok_or_else(|| StoreError::NotFound("No collection with name `jobs` found.".into()))?;
        Ok(CollectionInfo {
            name: schema.name.clone(),
            num_documents: inner.documents.len() as u64,
            fields: schema.fields.clone(),
            extra: serde_json::Map::new(),
        })
    }
}

#[async_trait]
impl SearchStore for MockStore {
    fn collection_name(&self) -> &str {
        "jobs"
    }

    async fn retrieve_collection(&self) -> Result<CollectionInfo> {
        let inner = self.inner.lock().unwrap();
        Self::check_up(&inner)?;
        Self::info(&inner)
    }

    async fn create_collection(&self, schema: &CollectionSchema) -> Result<CollectionInfo> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_up(&inner)?;
        if inner.fail_create {
            return Err(StoreError::Api {
                status: 400,
                message: "bad schema".to_string(),
            });
        }
        inner.schema = Some(schema.clone());
        Self::info(&inner)
    }

    async fn delete_collection(&self) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_up(&inner)?;
        Self::info(&inner)?;
        inner.schema = None;
        inner.documents.clear();
        Ok(())
    }

    async fn list_collections(&self) -> Result<Vec<CollectionInfo>> {
        let inner = self.inner.lock().unwrap();
        Self::check_up(&inner)?;
        Ok(Self::info(&inner).into_iter().collect())
    }

    async fn search(&self, params: &SearchParams) -> Result<SearchResponse> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_up(&inner)?;
        inner.searches.push(params.clone());

        let all: Vec<Value> = match &inner.hits {
            Some(hits) => hits.clone(),
            None => inner.documents.values().cloned().collect(),
        };
        let found = all.len() as u64;
        let take = params
            .per_page
            .or(params.limit)
            .map(|n| n as usize)
            .unwrap_or(all.len());
        let skip = params.offset.unwrap_or(0) as usize;

        Ok(SearchResponse {
            found,
            hits: all
                .into_iter()
                .skip(skip)
                .take(take)
                .map(|document| SearchHit { document })
                .collect(),
        })
    }

    async fn get_document(&self, id: &str) -> Result<Value> {
        let inner = self.inner.lock().unwrap();
        Self::check_up(&inner)?;
        inner
            .documents
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Could not find a document with id: {id}")))
    }

    async fn upsert_documents(&self, jsonl: String) -> Result<Vec<ImportLineResult>> {
        let mut inner = self.inner.lock().unwrap();
        let call = inner.import_calls;
        inner.import_calls += 1;
        Self::check_up(&inner)?;
        if inner.failing_imports.contains(&call) {
            return Err(StoreError::Api {
                status: 500,
                message: format!("import call {call} rejected"),
            });
        }

        let mut results = Vec::new();
        for line in jsonl.lines() {
            let parsed: Option<Value> = serde_json::from_str(line).ok();
            let id = parsed
                .as_ref()
                .and_then(|d| d.get("id"))
                .and_then(Value::as_str)
                .map(String::from);
            match (id, parsed) {
                (Some(id), Some(document)) => {
                    inner.documents.insert(id, document);
                    results.push(ImportLineResult {
                        success: true,
                        error: None,
                    });
                }
                _ => results.push(ImportLineResult {
                    success: false,
                    error: Some("Document is missing an `id`.".to_string()),
                }),
            }
        }
        Ok(results)
    }
}
