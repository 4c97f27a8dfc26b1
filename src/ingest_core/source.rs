//! Asynchronous dataset loading with per-file failure isolation

use super::normalizer::{parse_csv, parse_jsonl, IngestError};
use crate::analytics_core::TransactionRecord;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Result of loading one dataset, keyed to its originating name.
#[derive(Debug)]
pub struct FileOutcome {
    pub name: String,
    pub result: Result<Vec<TransactionRecord>, IngestError>,
}

/// One loadable dataset. Implementations must be safe to move onto a task.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Display name used for the report and for diagnostics.
    fn name(&self) -> &str;

    async fn load(&self) -> Result<Vec<TransactionRecord>, IngestError>;
}

/// A dataset on disk, dispatched on file extension.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    fn name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("<unnamed>")
    }

    async fn load(&self) -> Result<Vec<TransactionRecord>, IngestError> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        // Reject unknown formats before touching the file.
        if extension != "csv" && extension != "jsonl" {
            return Err(IngestError::UnsupportedFileType(extension));
        }

        let text = tokio::fs::read_to_string(&self.path).await?;
        match extension.as_str() {
            "csv" => parse_csv(&text),
            _ => parse_jsonl(&text),
        }
    }
}

/// Load every source as its own task and collect per-file outcomes in input
/// order. One file failing to parse or validate never aborts its siblings.
pub async fn load_batch(sources: Vec<Arc<dyn DatasetSource>>) -> Vec<FileOutcome> {
    let mut handles = Vec::with_capacity(sources.len());
    for source in sources {
        handles.push(tokio::spawn(async move {
            let name = source.name().to_string();
            let result = source.load().await;
            if let Err(ref err) = result {
                log::error!("❌ Failed to ingest '{}': {}", name, err);
            } else if let Ok(ref records) = result {
                log::info!("📥 Ingested '{}': {} records", name, records.len());
            }
            FileOutcome { name, result }
        }));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => log::error!("Ingest task failed: {}", err),
        }
    }
    outcomes
}
