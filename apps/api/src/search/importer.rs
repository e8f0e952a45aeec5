//! Batch Importer — CSV file → mapped documents → upsert batches.
//!
//! The whole file is read and mapped before the first write, so file-level
//! problems (missing, empty, undecodable) never leave a partial import.
//! Once writing starts, every batch is attempted and its outcome recorded.

use std::collections::HashMap;
use std::path::Path;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::search::mapper::{map_row, ColumnMapping};
use crate::search::models::JobDocument;
use crate::store::schema::jobs_collection_schema;
use crate::store::{SearchStore, StoreError};

pub const BATCH_SIZE: usize = 100;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Job data file not found: {0}")]
    FileNotFound(String),

    #[error("CSV file is empty: {0}")]
    Empty(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result of writing one batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub index: usize,
    pub documents: usize,
    pub imported: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none() && self.imported == self.documents
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    pub total_documents: usize,
    pub batches: Vec<BatchOutcome>,
}

impl ImportReport {
    pub fn attempted(&self) -> usize {
        self.batches.len()
    }

    pub fn succeeded(&self) -> usize {
        self.batches.iter().filter(|b| b.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }
}

/// Reads and maps every data row of `path`. IDs follow row order from 1.
pub fn read_documents(
    path: &Path,
    columns: &ColumnMapping,
    imported_on: NaiveDate,
) -> Result<Vec<JobDocument>, ImportError> {
    let display = path.display().to_string();
    if !path.is_file() {
        return Err(ImportError::FileNotFound(display));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut documents = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        let row_number = u32::try_from(index + 1).unwrap_or(u32::MAX);
        documents.push(map_row(&row, row_number, imported_on, columns));
    }

    if documents.is_empty() {
        return Err(ImportError::Empty(display));
    }
    Ok(documents)
}

/// Writes `documents` in consecutive chunks of `batch_size`, one upsert per
/// chunk. A failed chunk is recorded and the next one still runs.
pub async fn import_documents(
    store: &dyn SearchStore,
    documents: &[JobDocument],
    batch_size: usize,
) -> ImportReport {
    let mut report = ImportReport {
        total_documents: documents.len(),
        batches: Vec::new(),
    };

    for (index, chunk) in documents.chunks(batch_size.max(1)).enumerate() {
        let outcome = match to_jsonl(chunk) {
            Ok(body) => write_batch(store, index, chunk.len(), body).await,
            Err(e) => BatchOutcome {
                index,
                documents: chunk.len(),
                imported: 0,
                error: Some(format!("serialization failed: {e}")),
            },
        };

        if outcome.succeeded() {
            info!("Imported batch {} of {} jobs", index, chunk.len());
        } else {
            warn!(
                "Batch {} imported {}/{} jobs: {}",
                index,
                outcome.imported,
                outcome.documents,
                outcome.error.as_deref().unwrap_or("per-document failures")
            );
        }
        report.batches.push(outcome);
    }

    info!(
        "Import finished: {} jobs, {}/{} batches succeeded",
        report.total_documents,
        report.succeeded(),
        report.attempted()
    );
    report
}

async fn write_batch(
    store: &dyn SearchStore,
    index: usize,
    size: usize,
    body: String,
) -> BatchOutcome {
    match store.upsert_documents(body).await {
        Ok(lines) => {
            let imported = lines.iter().filter(|l| l.success).count();
            let error = lines
                .iter()
                .find_map(|l| l.error.clone())
                .filter(|_| imported < size);
            BatchOutcome {
                index,
                documents: size,
                imported,
                error,
            }
        }
        Err(e) => BatchOutcome {
            index,
            documents: size,
            imported: 0,
            error: Some(e.to_string()),
        },
    }
}

fn to_jsonl(documents: &[JobDocument]) -> Result<String, serde_json::Error> {
    let lines = documents
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

/// Reads `path` and imports it, stamping today's date on every document.
pub async fn import_file(
    store: &dyn SearchStore,
    path: &Path,
    columns: &ColumnMapping,
) -> Result<ImportReport, ImportError> {
    info!("Looking for job data file: {}", path.display());
    let documents = read_documents(path, columns, Local::now().date_naive())
        .inspect_err(|e| error!("Job data import aborted: {e}"))?;
    info!("Found {} rows in {}", documents.len(), path.display());
    Ok(import_documents(store, &documents, BATCH_SIZE).await)
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SetupOutcome {
    AlreadyExists,
    Created {
        #[serde(skip_serializing_if = "Option::is_none")]
        import: Option<ImportReport>,
        #[serde(skip_serializing_if = "Option::is_none")]
        import_error: Option<String>,
    },
}

/// Creates the jobs collection and imports the data file unless the
/// collection already exists. A failed import still counts as created.
pub async fn setup_collection(
    store: &dyn SearchStore,
    path: &Path,
    columns: &ColumnMapping,
) -> Result<SetupOutcome, StoreError> {
    if store.retrieve_collection().await.is_ok() {
        info!("Jobs collection '{}' already exists", store.collection_name());
        return Ok(SetupOutcome::AlreadyExists);
    }

    info!("Creating jobs collection '{}'...", store.collection_name());
    store
        .create_collection(&jobs_collection_schema(store.collection_name()))
        .await
        .inspect_err(|e| error!("Error creating collection: {e}"))?;
    info!("Collection created successfully");

    Ok(match import_file(store, path, columns).await {
        Ok(report) => SetupOutcome::Created {
            import: Some(report),
            import_error: None,
        },
        Err(e) => SetupOutcome::Created {
            import: None,
            import_error: Some(e.to_string()),
        },
    })
}
