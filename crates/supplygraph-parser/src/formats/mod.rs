mod classifier;
mod common;

pub use classifier::{FormatClassifier, WideMatrixLayout, MIN_PRODUCT_COLUMNS};
pub use common::{classify_column, parse_number, ColumnRole};
