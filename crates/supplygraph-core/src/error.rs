// crates/supplygraph-core/src/error.rs

use supplygraph_parser::ParserError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Input table could not be read: {0}")]
    Parser(#[from] ParserError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid scope id '{scope}': {reason}")]
    InvalidScope { scope: String, reason: String },

    #[error("Wide-matrix finalization failed at line {line_index}: {message}")]
    PostPass { line_index: usize, message: String },

    #[error("Ingestion task failed: {0}")]
    Join(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;
