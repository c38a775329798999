use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use supplygraph_parser::{parse_number, RawRow, TableHeader};

use crate::types::{DemandRecord, NodeType, WideDemandRow};

/// First year of the synthetic calendar assigned to embedded series columns.
pub const SERIES_BASE_YEAR: i64 = 2024;

/// Demand type attached to every wide-matrix observation.
pub const MATRIX_DEMAND_TYPE: &str = "store";

/// `YYYY-MM-01` for the zero-based position of a series column, starting January 2024.
pub fn synthetic_month(index: usize) -> String {
    let year = SERIES_BASE_YEAR + (index / 12) as i64;
    let month = 1 + index % 12;
    format!("{year:04}-{month:02}-01")
}

/// Demand records for a row's embedded series (`t1`, `period2`, `sales3`, `month4`, ...).
/// Columns are ranked by their number; every ranked column consumes a month even when its
/// value is not numeric.
pub fn embedded_series(
    header: &TableHeader,
    row: &RawRow,
    node_id: &str,
    node_type: NodeType,
) -> Vec<DemandRecord> {
    header
        .series_columns()
        .into_iter()
        .enumerate()
        .filter_map(|(rank, (column, _))| {
            let value = row.value(column).and_then(parse_number)?;
            Some(DemandRecord::new(
                node_id,
                node_type.as_str(),
                synthetic_month(rank),
                value,
            ))
        })
        .collect()
}

/// Reduces a date or timestamp cell to its day. Recognised formats come back as
/// `YYYY-MM-DD`; anything else is cut at the first whitespace.
pub fn date_portion(value: &str) -> Option<String> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
    ];

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let day = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        });

    match day {
        Some(day) => Some(day.format("%Y-%m-%d").to_string()),
        None => trimmed.split_whitespace().next().map(str::to_string),
    }
}

/// Wide-format fallback: one row per date with the summed value of each product column.
/// Dates keep first-seen order and products with no observation read as zero.
#[derive(Debug, Clone)]
pub struct WideDemandTable {
    products: Vec<String>,
    rows: Vec<(String, Vec<f64>)>,
    index: HashMap<String, usize>,
}

impl WideDemandTable {
    pub fn new(products: Vec<String>) -> Self {
        Self {
            products,
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn row_mut(&mut self, date: &str) -> &mut Vec<f64> {
        let idx = match self.index.get(date) {
            Some(&idx) => idx,
            None => {
                let idx = self.rows.len();
                self.rows
                    .push((date.to_string(), vec![0.0; self.products.len()]));
                self.index.insert(date.to_string(), idx);
                idx
            }
        };
        &mut self.rows[idx].1
    }

    /// Makes sure `date` has a row even if none of its cells parse.
    pub fn touch(&mut self, date: &str) {
        self.row_mut(date);
    }

    pub fn add(&mut self, date: &str, product: usize, value: f64) {
        if let Some(total) = self.row_mut(date).get_mut(product) {
            *total += value;
        }
    }

    pub fn into_rows(self) -> Vec<WideDemandRow> {
        let products = self.products;
        self.rows
            .into_iter()
            .map(|(date, totals)| WideDemandRow {
                date,
                values: products.iter().cloned().zip(totals).collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_months_roll_over_years() {
        assert_eq!(synthetic_month(0), "2024-01-01");
        assert_eq!(synthetic_month(11), "2024-12-01");
        assert_eq!(synthetic_month(12), "2025-01-01");
        assert_eq!(synthetic_month(25), "2026-02-01");
    }

    #[test]
    fn series_ranks_include_unparsable_columns() {
        let header = TableHeader::new(["node", "t3", "t1", "t2"]).expect("header");
        let row = RawRow::new(
            2,
            vec!["Store1".into(), "30".into(), "10".into(), "oops".into()],
        );

        let records = embedded_series(&header, &row, "Store1", NodeType::Store);
        let dates: Vec<(&str, f64)> = records
            .iter()
            .map(|r| (r.date.as_str(), r.demand))
            .collect();

        assert_eq!(dates, [("2024-01-01", 10.0), ("2024-03-01", 30.0)]);
        assert!(records.iter().all(|r| r.demand_type == "store"));
    }

    #[test]
    fn rows_without_series_yield_nothing() {
        let header = TableHeader::new(["node", "plant"]).expect("header");
        let row = RawRow::new(2, vec!["A".into(), "B".into()]);

        assert!(embedded_series(&header, &row, "A", NodeType::Store).is_empty());
    }

    #[test]
    fn date_portion_drops_time_of_day() {
        assert_eq!(date_portion("2024-01-02").as_deref(), Some("2024-01-02"));
        assert_eq!(date_portion("2024-05-01 17:30:00").as_deref(), Some("2024-05-01"));
        assert_eq!(date_portion("2024-05-01T17:30:00").as_deref(), Some("2024-05-01"));
        assert_eq!(date_portion("2024-05-01T17:30:00+02:00").as_deref(), Some("2024-05-01"));
        assert_eq!(date_portion("2024/05/01").as_deref(), Some("2024-05-01"));
        assert_eq!(date_portion("Week 12 (Mon)").as_deref(), Some("Week"));
        assert_eq!(date_portion("  "), None);
    }

    #[test]
    fn wide_table_sums_per_date() {
        let mut table = WideDemandTable::new(vec!["A".into(), "B".into()]);
        table.add("2024-01-01", 0, 1.0);
        table.add("2024-01-01", 0, 2.5);
        table.touch("2024-01-02");
        table.add("2024-01-01", 1, 4.0);

        let rows = table.into_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].values, [("A".to_string(), 3.5), ("B".to_string(), 4.0)]);
        assert_eq!(rows[1].values, [("A".to_string(), 0.0), ("B".to_string(), 0.0)]);
    }
}
