//! Typesense HTTP client implementing `SearchStore`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{
    CollectionInfo, CollectionSchema, ImportLineResult, Result, SearchParams, SearchResponse,
    SearchStore, StoreError,
};
use crate::config::TypesenseConfig;

const API_KEY_HEADER: &str = "X-TYPESENSE-API-KEY";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct TypesenseClient {
    client: Client,
    base_url: String,
    api_key: String,
    collection: String,
}

impl TypesenseClient {
    pub fn new(config: &TypesenseConfig) -> Result<Self> {
        Ok(Self {
            client: Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?,
            base_url: config.base_url(),
            api_key: config.api_key.clone(),
            collection: config.collection.clone(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.base_url, self.collection)
    }

    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(API_KEY_HEADER, &self.api_key)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = check_status(self.with_key(request).send().await?).await?;
        Ok(response.json().await?)
    }
}

/// Maps non-2xx responses to `StoreError`, reading the engine's `message`.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or(body);
    if status.as_u16() == 404 {
        Err(StoreError::NotFound(message))
    } else {
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Parses the JSON Lines body of a bulk import response.
fn parse_import_lines(body: &str) -> Result<Vec<ImportLineResult>> {
    body.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).map_err(StoreError::from))
        .collect()
}

#[async_trait]
impl SearchStore for TypesenseClient {
    fn collection_name(&self) -> &str {
        &self.collection
    }

    async fn retrieve_collection(&self) -> Result<CollectionInfo> {
        self.send_json(self.client.get(self.collection_url())).await
    }

    async fn create_collection(&self, schema: &CollectionSchema) -> Result<CollectionInfo> {
        let url = format!("{}/collections", self.base_url);
        self.send_json(self.client.post(url).json(schema)).await
    }

    async fn delete_collection(&self) -> Result<()> {
        let request = self.with_key(self.client.delete(self.collection_url()));
        check_status(request.send().await?).await?;
        Ok(())
    }

    async fn list_collections(&self) -> Result<Vec<CollectionInfo>> {
        let url = format!("{}/collections", self.base_url);
        self.send_json(self.client.get(url)).await
    }

    async fn search(&self, params: &SearchParams) -> Result<SearchResponse> {
        debug!("Typesense search: {:?}", params);
        let url = format!("{}/documents/search", self.collection_url());
        self.send_json(self.client.get(url).query(params)).await
    }

    async fn get_document(&self, id: &str) -> Result<Value> {
        let url = format!("{}/documents/{}", self.collection_url(), id);
        self.send_json(self.client.get(url)).await
    }

    async fn upsert_documents(&self, jsonl: String) -> Result<Vec<ImportLineResult>> {
        let url = format!("{}/documents/import", self.collection_url());
        let request = self
            .client
            .post(url)
            .query(&[("action", "upsert")])
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(jsonl);
        let response = check_status(self.with_key(request).send().await?).await?;
        let body = response.text().await?;
        parse_import_lines(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TypesenseConfig {
        TypesenseConfig {
            host: "localhost".to_string(),
            port: 8108,
            protocol: "http".to_string(),
            api_key: "xyz".to_string(),
            collection: "jobs".to_string(),
        }
    }

    #[test]
    fn test_collection_url() {
        let client = TypesenseClient::new(&config()).unwrap();
        assert_eq!(client.collection_url(), "http://localhost:8108/collections/jobs");
        assert_eq!(client.collection_name(), "jobs");
    }

    #[test]
    fn test_parse_import_lines_mixed() {
        let body = "{\"success\":true}\n{\"success\":false,\"error\":\"Bad JSON.\"}\n";
        let lines = parse_import_lines(body).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].success);
        assert!(!lines[1].success);
    }

    #[test]
    fn test_parse_import_lines_rejects_garbage() {
        assert!(parse_import_lines("not json").is_err());
    }
}
