use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ParserError;
use crate::formats::{classify_column, ColumnRole};

/// Shape of the table as decided by the format classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableMode {
    /// One row per node or route, optionally carrying a short embedded series.
    Mixed,
    /// One row per time unit, one numeric column per product.
    WideMatrix,
}

impl TableMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableMode::Mixed => "mixed",
            TableMode::WideMatrix => "wide_matrix",
        }
    }
}

impl fmt::Display for TableMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column names of the input table together with the role each one plays.
#[derive(Debug, Clone)]
pub struct TableHeader {
    names: Vec<String>,
    roles: Vec<ColumnRole>,
}

impl TableHeader {
    pub fn new<I, S>(names: I) -> Result<Self, ParserError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .collect();

        if names.is_empty() {
            return Err(ParserError::EmptyData);
        }
        if names.iter().all(|name| name.is_empty()) {
            return Err(ParserError::InvalidHeader {
                message: "every column name is blank".to_string(),
            });
        }

        let roles = names.iter().map(|name| classify_column(name)).collect();
        Ok(Self { names, roles })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn roles(&self) -> &[ColumnRole] {
        &self.roles
    }

    pub fn role(&self, index: usize) -> Option<ColumnRole> {
        self.roles.get(index).copied()
    }

    /// Index of the first column playing `role`.
    pub fn position(&self, role: ColumnRole) -> Option<usize> {
        self.roles.iter().position(|candidate| *candidate == role)
    }

    /// Embedded series columns ordered by their numeric suffix. Ties keep header order.
    pub fn series_columns(&self) -> Vec<(usize, u64)> {
        let mut series: Vec<(usize, u64)> = self
            .roles
            .iter()
            .enumerate()
            .filter_map(|(idx, role)| match role {
                ColumnRole::Series(number) => Some((idx, *number)),
                _ => None,
            })
            .collect();
        series.sort_by_key(|(_, number)| *number);
        series
    }
}

/// One normalized input record. Values are aligned with the [`TableHeader`]; a short record
/// simply has fewer values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    line_index: usize,
    values: Vec<String>,
}

impl RawRow {
    pub fn new(line_index: usize, values: Vec<String>) -> Self {
        Self { line_index, values }
    }

    pub fn line_index(&self) -> usize {
        self.line_index
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Value at `index`, or `None` when missing or blank.
    pub fn non_empty(&self, index: usize) -> Option<&str> {
        self.value(index).filter(|value| !value.is_empty())
    }

    pub fn get<'a>(&'a self, header: &TableHeader, column: &str) -> Option<&'a str> {
        header
            .names()
            .iter()
            .position(|name| name == column)
            .and_then(|idx| self.value(idx))
    }

    /// Column name and value pairs in header order.
    pub fn iter<'a>(&'a self, header: &'a TableHeader) -> impl Iterator<Item = (&'a str, &'a str)> {
        header
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    pub fn is_blank(&self) -> bool {
        self.values.iter().all(|value| value.trim().is_empty())
    }
}
