//! RustyTable - structural addressing and typed table extraction for HTML
//!
//! Layers, leaf first:
//! - `core` / `reader`: lenient HTML tokenizer and pull-event reader
//! - `dom`: arena document tree, tree builder, structural navigation
//! - `path`: structural paths (`/BODY[0]/TABLE[7]/TBODY[0]/TR[6]/TD[1]`)
//! - `table`: logical tables, embedding rows/cells, row and column lines
//! - `extract`: settings, value coercion, the extraction pipeline
//! - `strategy`: sequential and parallel batch extraction
//!
//! ```
//! use rustytable::{HtmlDocument, TableExtractionSettings, ValueType};
//!
//! let doc = HtmlDocument::parse(
//!     "<html><body><table>\
//!      <tr><td></td><td>2005</td><td>2006</td></tr>\
//!      <tr><td>EPS</td><td>3,33</td><td>4,38</td></tr>\
//!      </table></body></html>",
//! );
//! let settings = TableExtractionSettings::row_major(ValueType::Integer, ValueType::Float);
//! let series = doc
//!     .extract_table("/BODY[0]/TABLE[0]/TBODY[0]/TR[1]/TD[1]", &settings)
//!     .unwrap();
//! assert_eq!(series.name, "EPS");
//! assert_eq!(series.len(), 2);
//! ```
//!
//! Nothing here mutates a document; a parsed [`HtmlDocument`] can be shared
//! across threads and queried concurrently.

pub mod core;
pub mod dom;
pub mod extract;
pub mod path;
pub mod reader;
pub mod strategy;
pub mod table;

pub use dom::{DocumentAccess, HtmlDocument, NodeId, ParseOptions, TreeBuilder, TreeError};
pub use extract::{
    extract, extract_str, CellValue, Dimension, ExtractedSeries, ExtractionError,
    ExtractionResult, NumberFormat, SeriesRecord, TableExtractionSettings, ValueType,
};
pub use path::{PathCache, PathParseError, PathSegment, StructuralPath};
pub use strategy::{extract_sequential, ExtractionRequest};
#[cfg(feature = "parallel")]
pub use strategy::parallel::extract_parallel;
pub use table::{find_enclosing_table, LogicalTable, TableError};
