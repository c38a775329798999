use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("header row invalid: {message}")]
    InvalidHeader { message: String },

    #[error("CSV error near line {line_index}: {source}")]
    Csv {
        line_index: usize,
        #[source]
        source: csv::Error,
    },

    #[error("data row {line_index} invalid: {message}")]
    DataRow { line_index: usize, message: String },

    #[error("no rows found in input table")]
    EmptyData,
}

impl ParserError {
    pub(crate) fn csv(line_index: usize, source: csv::Error) -> Self {
        ParserError::Csv { line_index, source }
    }
}
