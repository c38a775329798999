use tracing::info;

use crate::model::{RawRow, TableHeader, TableMode};

use super::{parse_number, ColumnRole};

/// Number of numeric sibling columns a dated row needs before the table is treated as a
/// wide matrix.
pub const MIN_PRODUCT_COLUMNS: usize = 3;

/// Columns that make up the wide matrix, fixed by the row that triggered detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideMatrixLayout {
    pub date_column: usize,
    pub product_columns: Vec<usize>,
    pub trigger_line: usize,
}

impl WideMatrixLayout {
    pub fn product_names<'a>(&'a self, header: &'a TableHeader) -> impl Iterator<Item = &'a str> {
        self.product_columns
            .iter()
            .filter_map(move |idx| header.name(*idx))
    }
}

/// Sticky per-job format decision. Starts in mixed mode; the first qualifying row switches
/// it to wide-matrix mode for the rest of the job.
#[derive(Debug, Clone, Default)]
pub struct FormatClassifier {
    layout: Option<WideMatrixLayout>,
}

impl FormatClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> TableMode {
        if self.layout.is_some() {
            TableMode::WideMatrix
        } else {
            TableMode::Mixed
        }
    }

    pub fn layout(&self) -> Option<&WideMatrixLayout> {
        self.layout.as_ref()
    }

    /// Inspects `row` and returns `true` only when this row switched the job into
    /// wide-matrix mode. Once switched, later rows are not inspected.
    pub fn observe(&mut self, header: &TableHeader, row: &RawRow) -> bool {
        if self.layout.is_some() {
            return false;
        }
        let Some(layout) = detect_wide_matrix(header, row) else {
            return false;
        };

        info!(
            line = layout.trigger_line,
            products = layout.product_columns.len(),
            "wide-matrix layout detected"
        );
        self.layout = Some(layout);
        true
    }
}

/// Route columns carry node ids, so numeric plant or hop codes are not product candidates.
fn detect_wide_matrix(header: &TableHeader, row: &RawRow) -> Option<WideMatrixLayout> {
    let date_column = header.position(ColumnRole::Date)?;

    let product_columns: Vec<usize> = header
        .roles()
        .iter()
        .enumerate()
        .filter(|(idx, role)| *idx != date_column && **role != ColumnRole::Date && !role.is_route())
        .filter(|(idx, _)| row.value(*idx).and_then(parse_number).is_some())
        .map(|(idx, _)| idx)
        .collect();

    if product_columns.len() < MIN_PRODUCT_COLUMNS {
        return None;
    }

    Some(WideMatrixLayout {
        date_column,
        product_columns,
        trigger_line: row.line_index(),
    })
}
