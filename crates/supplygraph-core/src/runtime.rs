use std::path::PathBuf;

use tokio::task;

use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::ingestion::{ingest_file, IngestionResult};
use crate::types::ScopeId;

/// Runs a whole ingestion on the blocking pool. The caller only sees the final outcome;
/// there is no partial result and no cancellation once started.
pub async fn ingest_path(
    path: PathBuf,
    scope: ScopeId,
    config: IngestConfig,
) -> Result<IngestionResult> {
    task::spawn_blocking(move || ingest_file(&path, &scope, &config))
        .await
        .map_err(|err| IngestError::Join(err.to_string()))?
}
