//! Extraction Module - tables to typed series
//!
//! - `settings`: what to read and how (serde-configurable)
//! - `value`: value types and text coercion
//! - `pipeline`: anchor resolution, series location, record decoding

pub mod pipeline;
pub mod settings;
pub mod value;

pub use pipeline::{
    extract, extract_str, ExtractedSeries, ExtractionError, ExtractionResult, SeriesRecord,
};
pub use settings::{Dimension, TableExtractionSettings};
pub use value::{coerce, CellValue, CoercionError, NumberFormat, ValueType};
