//! Table Module - logical tables over the document tree
//!
//! - `recognizer`: enclosing table, row/column indices, embedding row/cell
//! - `lines`: the cells of a row or of a column

pub mod lines;
pub mod recognizer;

pub use lines::{cells_of_row, column_of, row_of};
pub use recognizer::{
    column_index, embedding_cell, embedding_row, find_enclosing_table, is_table_or_body,
    row_index, LogicalTable,
};

use crate::dom::{DocumentAccess, NodeId};
use thiserror::Error;

/// A table query on a node that has no table structure around it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("node {node} is not inside a table {expected}")]
    NotInTable { node: NodeId, expected: &'static str },
}

/// `TD` or `TH`
pub fn is_cell<D: DocumentAccess + ?Sized>(doc: &D, node: NodeId) -> bool {
    matches!(doc.tag_name(node), Some("TD" | "TH"))
}

/// `TR`
pub fn is_row<D: DocumentAccess + ?Sized>(doc: &D, node: NodeId) -> bool {
    doc.tag_name(node) == Some("TR")
}

/// `TBODY`, `THEAD` or `TFOOT`
pub fn is_row_group<D: DocumentAccess + ?Sized>(doc: &D, node: NodeId) -> bool {
    matches!(doc.tag_name(node), Some("TBODY" | "THEAD" | "TFOOT"))
}
