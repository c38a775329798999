use once_cell::sync::Lazy;
use regex::Regex;

static SERIES_COLUMN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:t|period|sales|month)([0-9]+)$").expect("series pattern is valid")
});

/// What a column means, decided once from its header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    /// `date` / `timestamp`
    Date,
    /// Route origin: `plant` / `factory` / `supplier`
    Plant,
    /// Route hop start: `node1` / `source` / `from`
    From,
    /// Route hop end: `node2` / `target` / `to`
    To,
    NodeId,
    NodeType,
    Product,
    /// Embedded series column such as `t3` or `month12`, carrying its number.
    Series(u64),
    Other,
}

impl ColumnRole {
    pub fn is_route(&self) -> bool {
        matches!(self, ColumnRole::Plant | ColumnRole::From | ColumnRole::To)
    }
}

pub fn classify_column(name: &str) -> ColumnRole {
    let lower = name.trim().to_ascii_lowercase();
    match lower.as_str() {
        "date" | "timestamp" => ColumnRole::Date,
        "plant" | "factory" | "supplier" => ColumnRole::Plant,
        "node1" | "source" | "from" => ColumnRole::From,
        "node2" | "target" | "to" => ColumnRole::To,
        "node" | "node_id" | "nodeid" | "id" | "name" | "location" => ColumnRole::NodeId,
        "type" | "node_type" => ColumnRole::NodeType,
        "product" | "product_id" | "sku" | "item" => ColumnRole::Product,
        _ => series_number(&lower).map_or(ColumnRole::Other, ColumnRole::Series),
    }
}

fn series_number(name: &str) -> Option<u64> {
    let captures = SERIES_COLUMN.captures(name)?;
    captures.get(1)?.as_str().parse().ok()
}

/// Parses a cell as a finite number. Blank, textual, `NaN` and infinite values yield `None`.
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}
