use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// Tenant or job identifier that namespaces every node and the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeId(String);

impl ScopeId {
    pub fn new(value: impl Into<String>) -> Result<Self, IngestError> {
        let value: String = value.into();
        let trimmed = value.trim();

        let reason = if trimmed.is_empty() {
            Some("scope id is empty")
        } else if trimmed == "." || trimmed == ".." {
            Some("scope id cannot be a relative directory")
        } else if trimmed.contains(|c: char| matches!(c, '/' | '\\' | '\0')) {
            Some("scope id cannot contain path separators")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(IngestError::InvalidScope {
                scope: value.clone(),
                reason: reason.to_string(),
            }),
            None => Ok(Self(trimmed.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for ScopeId {
    type Error = IngestError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ScopeId::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Store,
    Factory,
    Supplier,
    Distributor,
    Plant,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Store => "store",
            NodeType::Factory => "factory",
            NodeType::Supplier => "supplier",
            NodeType::Distributor => "distributor",
            NodeType::Plant => "plant",
        }
    }

    /// Guesses a type from naming conventions. Tests run in order and the first hit wins;
    /// identifiers matching nothing are treated as demand points.
    pub fn infer(id: &str) -> Self {
        let lower = id.to_lowercase();
        if lower.contains("store") || lower.contains("retail") {
            NodeType::Store
        } else if lower.contains("fac") || lower.contains("plant") {
            NodeType::Factory
        } else if lower.contains("sup") {
            NodeType::Supplier
        } else if lower.contains("dist") || lower.contains("warehouse") {
            NodeType::Distributor
        } else {
            NodeType::Store
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for NodeType {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "store" => Ok(NodeType::Store),
            "factory" => Ok(NodeType::Factory),
            "supplier" => Ok(NodeType::Supplier),
            "distributor" => Ok(NodeType::Distributor),
            "plant" => Ok(NodeType::Plant),
            other => Err(format!("unknown node type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    Supply,
    Ship,
    Produce,
}

impl EdgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Supply => "supply",
            EdgeType::Ship => "ship",
            EdgeType::Produce => "produce",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub node_id: String,
    pub node_type: NodeType,
    pub scope_id: ScopeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source_id: String,
    pub target_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<EdgeType>,
}

impl Edge {
    pub fn new(source: &str, target: &str, edge_type: EdgeType) -> Self {
        Self {
            source_id: source.to_string(),
            target_id: target.to_string(),
            edge_type: Some(edge_type),
        }
    }
}

/// One (node, day, value) observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandRecord {
    pub node_id: String,
    #[serde(rename = "type")]
    pub demand_type: String,
    pub date: String,
    pub demand: f64,
}

impl DemandRecord {
    pub fn new(
        node_id: impl Into<String>,
        demand_type: impl Into<String>,
        date: impl Into<String>,
        demand: f64,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            demand_type: demand_type.into(),
            date: date.into(),
            demand,
        }
    }
}

/// Per-date totals across every product column of a wide matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WideDemandRow {
    pub date: String,
    pub values: Vec<(String, f64)>,
}
