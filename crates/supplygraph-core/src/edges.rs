use supplygraph_parser::{ColumnRole, RawRow, TableHeader};

use crate::registry::{EndpointRole, NodeRegistry};
use crate::types::{Edge, EdgeType};

/// Route participants found on one row. Missing and blank cells are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteEndpoints<'a> {
    pub plant: Option<&'a str>,
    pub from: Option<&'a str>,
    pub to: Option<&'a str>,
    pub node_id: Option<&'a str>,
}

impl<'a> RouteEndpoints<'a> {
    pub fn resolve(header: &TableHeader, row: &'a RawRow) -> Self {
        let cell = |role: ColumnRole| header.position(role).and_then(|idx| row.non_empty(idx));
        Self {
            plant: cell(ColumnRole::Plant),
            from: cell(ColumnRole::From),
            to: cell(ColumnRole::To),
            node_id: cell(ColumnRole::NodeId),
        }
    }

    /// Registers every present endpoint using its position-specific type.
    pub fn register(&self, registry: &mut NodeRegistry) {
        let endpoints = [
            (self.plant, EndpointRole::Plant),
            (self.from, EndpointRole::From),
            (self.to, EndpointRole::To),
        ];
        for (id, role) in endpoints {
            if let Some(id) = id {
                registry.ensure_endpoint(id, role);
            }
        }
    }
}

/// Append-only edge list. Identical relationships from different rows are kept as separate
/// edges so row support survives into the output.
#[derive(Debug, Clone, Default)]
pub struct EdgeBuilder {
    edges: Vec<Edge>,
}

impl EdgeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `plant -> from` (supply), `from -> to` (ship) and `plant -> node` (produce).
    pub fn add_route(&mut self, route: &RouteEndpoints<'_>) {
        if let (Some(plant), Some(from)) = (route.plant, route.from) {
            self.edges.push(Edge::new(plant, from, EdgeType::Supply));
        }
        if let (Some(from), Some(to)) = (route.from, route.to) {
            self.edges.push(Edge::new(from, to, EdgeType::Ship));
        }
        if let (Some(plant), Some(node_id)) = (route.plant, route.node_id) {
            if plant != node_id {
                self.edges.push(Edge::new(plant, node_id, EdgeType::Produce));
            }
        }
    }

    /// Same as [`EdgeBuilder::add_route`], plus `plant -> first product` when the row names a
    /// plant but no `from` hop.
    pub fn add_matrix_route(&mut self, route: &RouteEndpoints<'_>, first_product: Option<&str>) {
        self.add_route(route);
        if let (Some(plant), None, Some(product)) = (route.plant, route.from, first_product) {
            self.edges.push(Edge::new(plant, product, EdgeType::Produce));
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }
}
