use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use supplygraph_parser::TableMode;
use tracing::{info, warn};

use crate::config::{HeaderPolicy, IngestConfig};
use crate::error::Result;
use crate::job::{RowStats, SupplyGraph};
use crate::types::{DemandRecord, Edge, EdgeType, Node, NodeType, ScopeId, WideDemandRow};

pub const NODES_FILE: &str = "nodes.csv";
pub const EDGES_FILE: &str = "edges.csv";
pub const DEMAND_FILE: &str = "demand.csv";
pub const SUMMARY_FILE: &str = "summary.json";

/// Locations of everything one ingestion run wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactPaths {
    pub nodes: PathBuf,
    pub edges: PathBuf,
    pub demand: PathBuf,
    pub summary: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            nodes: dir.join(NODES_FILE),
            edges: dir.join(EDGES_FILE),
            demand: dir.join(DEMAND_FILE),
            summary: dir.join(SUMMARY_FILE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandFormat {
    Long,
    Wide,
}

/// Reproducibility record written next to the artifacts. Carries no wall-clock data so
/// identical inputs produce identical files.
#[derive(Debug, Clone, Serialize)]
pub struct IngestionSummary {
    pub scope_id: ScopeId,
    pub mode: TableMode,
    pub input_hash: String,
    pub product_columns: Vec<String>,
    pub rows: RowStats,
    pub node_count: usize,
    pub edge_count: usize,
    pub demand_records: usize,
    pub wide_demand_rows: usize,
    pub demand_format: DemandFormat,
    pub node_types: Vec<NodeType>,
    pub edge_types: Vec<EdgeType>,
}

impl IngestionSummary {
    pub fn new(scope: &ScopeId, graph: &SupplyGraph, input_hash: String) -> Self {
        let mut node_types = Vec::new();
        for node in &graph.nodes {
            if !node_types.contains(&node.node_type) {
                node_types.push(node.node_type);
            }
        }
        let mut edge_types = Vec::new();
        for edge_type in graph.edges.iter().filter_map(|edge| edge.edge_type) {
            if !edge_types.contains(&edge_type) {
                edge_types.push(edge_type);
            }
        }

        Self {
            scope_id: scope.clone(),
            mode: graph.mode,
            input_hash,
            product_columns: graph.product_columns.clone(),
            rows: graph.stats,
            node_count: graph.nodes.len(),
            edge_count: graph.edges.len(),
            demand_records: graph.demand.len(),
            wide_demand_rows: graph.wide_demand.len(),
            demand_format: demand_format(graph),
            node_types,
            edge_types,
        }
    }
}

/// Long-format demand unless it is empty and wide rows exist.
pub fn demand_format(graph: &SupplyGraph) -> DemandFormat {
    if graph.demand.is_empty() && !graph.wide_demand.is_empty() {
        DemandFormat::Wide
    } else {
        DemandFormat::Long
    }
}

/// A record as an ordered list of named cells. Optional fields that are unset are left out,
/// which is what makes header selection matter.
pub trait TabularRecord {
    fn fields(&self) -> Vec<(String, String)>;
}

impl TabularRecord for Node {
    fn fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("node_id".to_string(), self.node_id.clone()),
            ("node_type".to_string(), self.node_type.as_str().to_string()),
            ("scope_id".to_string(), self.scope_id.as_str().to_string()),
        ];
        if let Some(product) = &self.product {
            fields.push(("product".to_string(), product.clone()));
        }
        fields
    }
}

impl TabularRecord for Edge {
    fn fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("source_id".to_string(), self.source_id.clone()),
            ("target_id".to_string(), self.target_id.clone()),
        ];
        if let Some(edge_type) = self.edge_type {
            fields.push(("edge_type".to_string(), edge_type.as_str().to_string()));
        }
        fields
    }
}

impl TabularRecord for DemandRecord {
    fn fields(&self) -> Vec<(String, String)> {
        vec![
            ("node_id".to_string(), self.node_id.clone()),
            ("type".to_string(), self.demand_type.clone()),
            ("date".to_string(), self.date.clone()),
            ("demand".to_string(), format_number(self.demand)),
        ]
    }
}

impl TabularRecord for WideDemandRow {
    fn fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::with_capacity(self.values.len() + 1);
        fields.push(("date".to_string(), self.date.clone()));
        for (product, value) in &self.values {
            fields.push((product.clone(), format_number(*value)));
        }
        fields
    }
}

/// Whole numbers print without a fractional part (`2200`, not `2200.0`).
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

pub fn table_header<T: TabularRecord>(records: &[T], policy: HeaderPolicy) -> Vec<String> {
    match policy {
        HeaderPolicy::FirstRecord => records
            .first()
            .map(|record| record.fields().into_iter().map(|(key, _)| key).collect())
            .unwrap_or_default(),
        HeaderPolicy::Union => {
            let mut seen = HashSet::new();
            let mut header = Vec::new();
            for record in records {
                for (key, _) in record.fields() {
                    if seen.insert(key.clone()) {
                        header.push(key);
                    }
                }
            }
            header
        }
    }
}

/// Writes `records` as CSV and returns how many cells were dropped because their column
/// was not part of the header. An empty collection produces an empty file.
pub fn write_table<T: TabularRecord, W: Write>(
    writer: W,
    records: &[T],
    policy: HeaderPolicy,
) -> Result<usize> {
    let header = table_header(records, policy);
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut dropped = 0usize;

    if !header.is_empty() {
        csv_writer.write_record(&header)?;
    }
    for record in records {
        let fields = record.fields();
        dropped += fields
            .iter()
            .filter(|(key, _)| !header.contains(key))
            .count();
        let row = header.iter().map(|column| {
            fields
                .iter()
                .find(|(key, _)| key == column)
                .map_or("", |(_, value)| value.as_str())
        });
        csv_writer.write_record(row)?;
    }

    csv_writer.flush()?;
    Ok(dropped)
}

fn write_table_file<T: TabularRecord>(
    path: &Path,
    records: &[T],
    policy: HeaderPolicy,
) -> Result<()> {
    let file = File::create(path)?;
    let dropped = write_table(file, records, policy)?;
    if dropped > 0 {
        warn!(
            path = %path.display(),
            dropped,
            "fields absent from the first record were left out of the header"
        );
    }
    Ok(())
}

pub fn artifact_dir(config: &IngestConfig, scope: &ScopeId) -> PathBuf {
    config.output_root.join(scope.as_str())
}

/// Writes nodes, edges, demand and the summary into the scope's directory. Files already
/// written stay in place if a later one fails.
pub fn write_artifacts(
    graph: &SupplyGraph,
    summary: &IngestionSummary,
    scope: &ScopeId,
    config: &IngestConfig,
) -> Result<ArtifactPaths> {
    let dir = artifact_dir(config, scope);
    fs::create_dir_all(&dir)?;
    let paths = ArtifactPaths::in_dir(&dir);
    let policy = config.header_policy;

    write_table_file(&paths.nodes, &graph.nodes, policy)?;
    write_table_file(&paths.edges, &graph.edges, policy)?;
    match summary.demand_format {
        DemandFormat::Long => write_table_file(&paths.demand, &graph.demand, policy)?,
        DemandFormat::Wide => write_table_file(&paths.demand, &graph.wide_demand, policy)?,
    }

    let mut summary_bytes = serde_json::to_vec_pretty(summary)?;
    summary_bytes.push(b'\n');
    fs::write(&paths.summary, summary_bytes)?;

    info!(dir = %dir.display(), "artifacts written");
    Ok(paths)
}
