//! Table extraction settings
//!
//! Stored alongside the anchor path by whoever configures an extraction.
//! Every field has a default, so a stored configuration only needs the
//! fields it changes:
//!
//! ```json
//! { "column_header_row": 1, "header_type": "integer", "value_type": "float" }
//! ```

use super::value::{NumberFormat, ValueType, DEFAULT_DATE_FORMATS};
use serde::{Deserialize, Serialize};

/// Orientation of the series inside the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// The series runs along a row; headers come from `column_header_row`
    #[default]
    RowMajor,
    /// The series runs down a column; headers come from `row_header_column`
    ColumnMajor,
}

/// How to turn a table into a typed series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableExtractionSettings {
    /// Column holding row labels
    pub row_header_column: usize,
    /// Row holding column labels
    pub column_header_row: usize,
    pub dimension: Dimension,
    /// Label of the series line, used when the anchor does not point into it
    pub series_name: Option<String>,
    pub header_type: ValueType,
    pub value_type: ValueType,
    /// Rows before this index are never candidates
    pub skip_rows: usize,
    /// Columns before this index are never candidates
    pub skip_columns: usize,
    pub number_format: NumberFormat,
    /// chrono format strings tried in order for `ValueType::Date`
    pub date_formats: Vec<String>,
    /// Read values from the `href` of the first link in a cell instead of its text
    pub extract_link_url: bool,
}

impl Default for TableExtractionSettings {
    fn default() -> Self {
        TableExtractionSettings {
            row_header_column: 0,
            column_header_row: 0,
            dimension: Dimension::RowMajor,
            series_name: None,
            header_type: ValueType::Text,
            value_type: ValueType::Text,
            skip_rows: 0,
            skip_columns: 0,
            number_format: NumberFormat::Auto,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
            extract_link_url: false,
        }
    }
}

impl TableExtractionSettings {
    /// Row-major settings with typed headers and values
    pub fn row_major(header_type: ValueType, value_type: ValueType) -> Self {
        TableExtractionSettings {
            header_type,
            value_type,
            ..Self::default()
        }
    }

    /// Column-major settings with typed headers and values
    pub fn column_major(header_type: ValueType, value_type: ValueType) -> Self {
        TableExtractionSettings {
            dimension: Dimension::ColumnMajor,
            header_type,
            value_type,
            ..Self::default()
        }
    }
}
