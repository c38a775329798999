pub mod config;
pub mod demand;
pub mod edges;
pub mod error;
pub mod ingestion;
pub mod job;
pub mod outputs;
pub mod registry;
#[cfg(feature = "runtime")]
pub mod runtime;
pub mod types;

pub use config::{HeaderPolicy, IngestConfig};
pub use error::{IngestError, Result};
pub use ingestion::{ingest_file, ingest_reader, transform, IngestionResult, Transformed};
pub use job::{IngestionJob, RowStats, SupplyGraph};
pub use outputs::{ArtifactPaths, IngestionSummary};
pub use types::{DemandRecord, Edge, EdgeType, Node, NodeType, ScopeId, WideDemandRow};
