use std::mem;

use serde::Serialize;
use supplygraph_parser::{
    parse_number, ColumnRole, FormatClassifier, ParserError, RawRow, TableHeader, TableMode,
    WideMatrixLayout,
};
use tracing::{debug, info};

use crate::demand::{date_portion, embedded_series, WideDemandTable, MATRIX_DEMAND_TYPE};
use crate::edges::{EdgeBuilder, RouteEndpoints};
use crate::error::{IngestError, Result};
use crate::registry::NodeRegistry;
use crate::types::{DemandRecord, Edge, Node, NodeType, ScopeId, WideDemandRow};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowStats {
    /// Non-blank rows read from the input; all of them are buffered.
    pub data_rows: usize,
    pub blank_rows: usize,
    /// Mixed-mode rows dropped for lacking a node identifier.
    pub skipped_rows: usize,
    /// Rows handled by the wide-matrix finalization pass.
    pub matrix_rows: usize,
    /// Matrix rows whose date cell is blank or missing; their demand is skipped.
    pub undated_rows: usize,
}

/// Everything one job derived from its input, in first-seen order.
#[derive(Debug, Clone)]
pub struct SupplyGraph {
    pub mode: TableMode,
    pub product_columns: Vec<String>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub demand: Vec<DemandRecord>,
    pub wide_demand: Vec<WideDemandRow>,
    pub stats: RowStats,
}

/// State of a single ingestion run.
///
/// Rows are pushed one at a time. Until the classifier spots a wide matrix each row is
/// turned into nodes, edges and demand immediately; from the triggering row on, rows are
/// only buffered. [`IngestionJob::finish`] then reads matrix demand from every buffered
/// row, earlier ones included.
#[derive(Debug)]
pub struct IngestionJob {
    header: TableHeader,
    classifier: FormatClassifier,
    registry: NodeRegistry,
    edges: EdgeBuilder,
    demand: Vec<DemandRecord>,
    buffer: Vec<RawRow>,
    matrix_start: Option<usize>,
    stats: RowStats,
}

impl IngestionJob {
    pub fn new(scope: ScopeId, header: TableHeader) -> Self {
        Self {
            header,
            classifier: FormatClassifier::new(),
            registry: NodeRegistry::new(scope),
            edges: EdgeBuilder::new(),
            demand: Vec::new(),
            buffer: Vec::new(),
            matrix_start: None,
            stats: RowStats::default(),
        }
    }

    pub fn mode(&self) -> TableMode {
        self.classifier.mode()
    }

    pub fn header(&self) -> &TableHeader {
        &self.header
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn stats(&self) -> RowStats {
        self.stats
    }

    pub fn record_blank_rows(&mut self, count: usize) {
        self.stats.blank_rows += count;
    }

    /// Incremental stage for one normalized, non-blank row.
    pub fn push_row(&mut self, row: RawRow) {
        self.stats.data_rows += 1;

        if self.classifier.observe(&self.header, &row) {
            self.matrix_start = Some(self.buffer.len());
        }
        if self.matrix_start.is_none() {
            self.process_mixed_row(&row);
        }
        self.buffer.push(row);
    }

    fn process_mixed_row(&mut self, row: &RawRow) {
        let route = RouteEndpoints::resolve(&self.header, row);
        let Some(node_id) = route.node_id else {
            self.stats.skipped_rows += 1;
            debug!(line = row.line_index(), "row has no node identifier; skipping");
            return;
        };

        let explicit = explicit_type(&self.header, row);
        let product = product_value(&self.header, row);
        let node_type = self.registry.ensure(node_id, explicit, product).node_type;

        route.register(&mut self.registry);
        self.edges.add_route(&route);
        self.demand
            .extend(embedded_series(&self.header, row, node_id, node_type));
    }

    /// Finalization stage. Runs the deferred wide-matrix pass, if any, and hands back the
    /// collected graph.
    pub fn finish(mut self) -> Result<SupplyGraph> {
        if self.stats.data_rows == 0 {
            return Err(ParserError::EmptyData.into());
        }

        let mode = self.classifier.mode();
        let mut product_columns = Vec::new();
        let mut wide_demand = Vec::new();

        if let (Some(start), Some(layout)) = (self.matrix_start, self.classifier.layout().cloned())
        {
            let buffer = mem::take(&mut self.buffer);
            product_columns = layout
                .product_names(&self.header)
                .map(str::to_string)
                .collect::<Vec<_>>();
            if product_columns.len() != layout.product_columns.len() {
                return Err(IngestError::PostPass {
                    line_index: layout.trigger_line,
                    message: "product columns are missing from the header".to_string(),
                });
            }
            wide_demand = self.finalize_matrix(&layout, &product_columns, &buffer, start);
        }

        info!(
            scope = %self.registry.scope(),
            mode = %mode,
            nodes = self.registry.len(),
            edges = self.edges.len(),
            demand = self.demand.len(),
            skipped = self.stats.skipped_rows,
            "ingestion job finished"
        );

        Ok(SupplyGraph {
            mode,
            product_columns,
            nodes: self.registry.into_nodes(),
            edges: self.edges.into_edges(),
            demand: self.demand,
            wide_demand,
            stats: self.stats,
        })
    }

    /// Replays every buffered row for matrix demand. Rows from `start` on are new to the
    /// graph and also contribute their nodes and edges; earlier rows already did so in the
    /// incremental stage.
    fn finalize_matrix(
        &mut self,
        layout: &WideMatrixLayout,
        products: &[String],
        rows: &[RawRow],
        start: usize,
    ) -> Vec<WideDemandRow> {
        for product in products {
            self.registry.ensure(product, None, Some(product.as_str()));
        }

        let first_product = products.first().map(String::as_str);
        let mut wide = WideDemandTable::new(products.to_vec());

        for (idx, row) in rows.iter().enumerate() {
            self.stats.matrix_rows += 1;

            if idx >= start {
                let route = RouteEndpoints::resolve(&self.header, row);
                if let Some(node_id) = route.node_id {
                    let explicit = explicit_type(&self.header, row);
                    let product = product_value(&self.header, row);
                    self.registry.ensure(node_id, explicit, product);
                }
                route.register(&mut self.registry);
                self.edges.add_matrix_route(&route, first_product);
            }

            let Some(date) = row.value(layout.date_column).and_then(date_portion) else {
                self.stats.undated_rows += 1;
                debug!(line = row.line_index(), "matrix row has no date; skipping demand");
                continue;
            };

            wide.touch(&date);
            for (position, &column) in layout.product_columns.iter().enumerate() {
                let Some(value) = row.value(column).and_then(parse_number) else {
                    continue;
                };
                self.demand.push(DemandRecord::new(
                    &products[position],
                    MATRIX_DEMAND_TYPE,
                    &date,
                    value,
                ));
                wide.add(&date, position, value);
            }
        }

        wide.into_rows()
    }
}

fn explicit_type(header: &TableHeader, row: &RawRow) -> Option<NodeType> {
    let value = header
        .position(ColumnRole::NodeType)
        .and_then(|idx| row.non_empty(idx))?;
    match NodeType::try_from(value) {
        Ok(node_type) => Some(node_type),
        Err(err) => {
            debug!(line = row.line_index(), "{err}; inferring from identifier");
            None
        }
    }
}

fn product_value<'a>(header: &TableHeader, row: &'a RawRow) -> Option<&'a str> {
    header
        .position(ColumnRole::Product)
        .and_then(|idx| row.non_empty(idx))
}
