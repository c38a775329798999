use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use blake3::Hasher;
use supplygraph_parser::{reader_builder, RowReader};
use tracing::info;

use crate::config::IngestConfig;
use crate::error::Result;
use crate::job::{IngestionJob, SupplyGraph};
use crate::outputs::{write_artifacts, ArtifactPaths, IngestionSummary};
use crate::types::ScopeId;

/// Hashes every byte the wrapped reader hands out.
pub struct HashingReader<R> {
    inner: R,
    hasher: Hasher,
}

impl<R: Read> HashingReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Hasher::new(),
        }
    }

    pub fn hex_digest(&self) -> String {
        self.hasher.finalize().to_hex().to_string()
    }
}

impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.hasher.update(&buf[..read]);
        Ok(read)
    }
}

/// Graph and summary for one input, before anything touches the filesystem.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub graph: SupplyGraph,
    pub summary: IngestionSummary,
}

#[derive(Debug, Clone)]
pub struct IngestionResult {
    pub graph: SupplyGraph,
    pub summary: IngestionSummary,
    pub artifacts: ArtifactPaths,
}

/// Streams `source` through the row stage and runs finalization. Any read failure aborts
/// the whole run.
pub fn transform<R: Read>(
    source: R,
    scope: &ScopeId,
    config: &IngestConfig,
) -> Result<Transformed> {
    let builder = reader_builder(config.delimiter);
    let mut rows = RowReader::with_builder(&builder, HashingReader::new(source))?;
    let mut job = IngestionJob::new(scope.clone(), rows.header().clone());

    info!(scope = %scope, columns = rows.header().len(), "ingestion job started");

    while let Some(row) = rows.next_row()? {
        job.push_row(row);
    }
    job.record_blank_rows(rows.blank_rows());

    let input_hash = rows.into_inner().hex_digest();
    let graph = job.finish()?;
    let summary = IngestionSummary::new(scope, &graph, input_hash);

    Ok(Transformed { graph, summary })
}

pub fn ingest_reader<R: Read>(
    source: R,
    scope: &ScopeId,
    config: &IngestConfig,
) -> Result<IngestionResult> {
    let Transformed { graph, summary } = transform(source, scope, config)?;
    let artifacts = write_artifacts(&graph, &summary, scope, config)?;

    Ok(IngestionResult {
        graph,
        summary,
        artifacts,
    })
}

pub fn ingest_file(path: &Path, scope: &ScopeId, config: &IngestConfig) -> Result<IngestionResult> {
    let file = File::open(path)?;
    ingest_reader(file, scope, config)
}
