pub mod errors;
pub mod formats;
pub mod model;
pub mod normalize;
mod reader;

pub use errors::ParserError;
pub use formats::{
    classify_column, parse_number, ColumnRole, FormatClassifier, WideMatrixLayout,
    MIN_PRODUCT_COLUMNS,
};
pub use model::{RawRow, TableHeader, TableMode};
pub use normalize::{is_blank_record, normalize_record, normalize_value};
pub use reader::{reader_builder, RowReader};
