use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_OUTPUT_ROOT: &str = "uploads";

/// How the artifact writer picks a table's columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderPolicy {
    /// Columns come from the first record only; fields other records add are dropped.
    /// Downstream loaders were built against this shape.
    #[default]
    FirstRecord,
    /// Columns are the union of every record's fields in first-seen order.
    Union,
}

impl TryFrom<&str> for HeaderPolicy {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "first_record" | "first" => Ok(HeaderPolicy::FirstRecord),
            "union" => Ok(HeaderPolicy::Union),
            other => Err(format!("unknown header policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    /// Artifacts land in `<output_root>/<scope_id>/`.
    pub output_root: PathBuf,
    pub header_policy: HeaderPolicy,
    pub delimiter: u8,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            header_policy: HeaderPolicy::default(),
            delimiter: b',',
        }
    }
}

impl IngestConfig {
    /// Reads `SUPPLYGRAPH_OUTPUT_ROOT` and `SUPPLYGRAPH_HEADER_POLICY`, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default();
        if let Ok(root) = env::var("SUPPLYGRAPH_OUTPUT_ROOT") {
            if !root.trim().is_empty() {
                config.output_root = PathBuf::from(root);
            }
        }
        if let Ok(policy) = env::var("SUPPLYGRAPH_HEADER_POLICY") {
            config.header_policy = HeaderPolicy::try_from(policy.as_str())?;
        }
        Ok(config)
    }

    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    pub fn with_header_policy(mut self, policy: HeaderPolicy) -> Self {
        self.header_policy = policy;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}
