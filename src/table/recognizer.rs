//! Table recognition
//!
//! Finds the logical table a node belongs to and the row/cell that embeds it.
//! Upward searches never leave the nearest table: a cell of a nested table
//! belongs to the nested table, not to the cell holding it.

use super::lines::cells_of_row;
use super::{is_cell, is_row, is_row_group, TableError};
use crate::dom::navigate::{find_ancestor, find_ancestor_until};
use crate::dom::{DocumentAccess, NodeId};

/// A table element together with the element holding its rows.
///
/// The two handles alias when the table has no `TBODY` or when the logical
/// table was recognized from a row holder itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogicalTable {
    table_element: NodeId,
    table_body: NodeId,
}

impl LogicalTable {
    pub fn new(table_element: NodeId, table_body: NodeId) -> Self {
        LogicalTable {
            table_element,
            table_body,
        }
    }

    /// Logical table of a `TABLE` element: its first `TBODY`, or the table itself
    pub fn for_table<D: DocumentAccess + ?Sized>(doc: &D, table: NodeId) -> Self {
        let body = doc
            .element_children(table)
            .into_iter()
            .find(|&child| doc.has_tag(child, "TBODY"))
            .unwrap_or(table);
        LogicalTable::new(table, body)
    }

    pub fn table_element(&self) -> NodeId {
        self.table_element
    }

    pub fn table_body(&self) -> NodeId {
        self.table_body
    }

    pub fn is_self_embedded(&self) -> bool {
        self.table_element == self.table_body
    }

    /// Rows in document order.
    ///
    /// A `TABLE` used as its own body yields its direct rows and the rows of
    /// every row group, in document order.
    pub fn rows<D: DocumentAccess + ?Sized>(&self, doc: &D) -> Vec<NodeId> {
        let mut rows = Vec::new();
        for child in doc.element_children(self.table_body) {
            if is_row(doc, child) {
                rows.push(child);
            } else if doc.has_tag(self.table_body, "TABLE") && is_row_group(doc, child) {
                rows.extend(
                    doc.element_children(child)
                        .into_iter()
                        .filter(|&row| is_row(doc, row)),
                );
            }
        }
        rows
    }

    pub fn row_count<D: DocumentAccess + ?Sized>(&self, doc: &D) -> usize {
        self.rows(doc).len()
    }

    /// Cell at literal position (`row`, `column`); column spans are not expanded
    pub fn cell_at<D: DocumentAccess + ?Sized>(
        &self,
        doc: &D,
        row: usize,
        column: usize,
    ) -> Option<NodeId> {
        let row = *self.rows(doc).get(row)?;
        cells_of_row(doc, row).get(column).copied()
    }
}

/// `TABLE` or `TBODY`
pub fn is_table_or_body<D: DocumentAccess + ?Sized>(doc: &D, node: NodeId) -> bool {
    doc.has_tag(node, "TABLE") || doc.has_tag(node, "TBODY")
}

/// Logical table enclosing `node`.
///
/// A `TABLE` or `TBODY` is its own anchor: `find_enclosing_table(tbody)` and
/// `find_enclosing_table(table)` both succeed.
pub fn find_enclosing_table<D: DocumentAccess + ?Sized>(
    doc: &D,
    node: NodeId,
) -> Option<LogicalTable> {
    if doc.has_tag(node, "TABLE") {
        return Some(LogicalTable::for_table(doc, node));
    }
    let holder = if doc.has_tag(node, "TBODY") {
        node
    } else {
        find_ancestor(doc, node, |id| is_table_or_body(doc, id))?
    };

    if doc.has_tag(holder, "TABLE") {
        // Reached the table without passing a TBODY (e.g. from inside THEAD)
        return Some(LogicalTable::new(holder, holder));
    }
    match doc.parent_of(holder) {
        Some(parent) if doc.has_tag(parent, "TABLE") && holder != node => {
            Some(LogicalTable::new(parent, holder))
        }
        _ => Some(LogicalTable::new(holder, holder)),
    }
}

/// The row containing `node` (or `node` itself when it is a row)
pub fn embedding_row<D: DocumentAccess + ?Sized>(
    doc: &D,
    node: NodeId,
) -> Result<NodeId, TableError> {
    if is_row(doc, node) {
        return Ok(node);
    }
    find_ancestor_until(
        doc,
        node,
        |id| is_row(doc, id),
        |id| is_table_or_body(doc, id) || is_row_group(doc, id),
    )
    .ok_or(TableError::NotInTable {
        node,
        expected: "row",
    })
}

/// The cell containing `node` (or `node` itself when it is a cell)
pub fn embedding_cell<D: DocumentAccess + ?Sized>(
    doc: &D,
    node: NodeId,
) -> Result<NodeId, TableError> {
    if is_cell(doc, node) {
        return Ok(node);
    }
    find_ancestor_until(
        doc,
        node,
        |id| is_cell(doc, id),
        |id| is_row(doc, id) || is_table_or_body(doc, id) || is_row_group(doc, id),
    )
    .ok_or(TableError::NotInTable {
        node,
        expected: "cell",
    })
}

/// Literal position of the cell embedding `node` among the cells of its row
pub fn column_index<D: DocumentAccess + ?Sized>(
    doc: &D,
    node: NodeId,
) -> Result<usize, TableError> {
    let cell = embedding_cell(doc, node)?;
    let row = embedding_row(doc, cell)?;
    if find_enclosing_table(doc, row).is_none() {
        return Err(TableError::NotInTable {
            node,
            expected: "table",
        });
    }
    cells_of_row(doc, row)
        .iter()
        .position(|&c| c == cell)
        .ok_or(TableError::NotInTable {
            node,
            expected: "cell",
        })
}

/// Position of the row embedding `node` among the rows of its logical table
pub fn row_index<D: DocumentAccess + ?Sized>(doc: &D, node: NodeId) -> Result<usize, TableError> {
    let row = embedding_row(doc, node)?;
    find_enclosing_table(doc, row)
        .and_then(|table| table.rows(doc).iter().position(|&r| r == row))
        .ok_or(TableError::NotInTable {
            node,
            expected: "row",
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::HtmlDocument;

    const PAGE: &str = "<html><body>\
        <div id=outside>x</div>\
        <table id=t>\
          <tr><td>Jahr</td><td>2001</td><td>2002</td></tr>\
          <tr id=r1><th>EPS</th><td id=c11>2,78</td><td><b id=bold>3,00</b></td></tr>\
          <tr><td>KGV</td><td>12</td>\
          <td><table id=inner><tr><td id=nested>n</td></tr></table></td></tr>\
        </table>\
        <table id=plain><thead><tr><th id=h>H</th></tr></thead></table>\
        </body></html>";

    fn by_id(doc: &HtmlDocument, id: &str) -> NodeId {
        doc.descendants_vec(doc.document_node_id())
            .into_iter()
            .find(|&n| doc.get_attribute(n, "id") == Some(id))
            .expect("element with id")
    }

    fn first_child(doc: &HtmlDocument, node: NodeId) -> NodeId {
        doc.element_children(node)[0]
    }

    #[test]
    fn test_table_and_body_self_embedding() {
        let doc = HtmlDocument::parse(PAGE);
        let table = by_id(&doc, "t");
        let tbody = first_child(&doc, table);

        let from_body = find_enclosing_table(&doc, tbody).expect("tbody is a table anchor");
        assert_eq!(from_body.table_body(), tbody);
        assert!(from_body.is_self_embedded());

        let from_table = find_enclosing_table(&doc, table).expect("table anchor");
        assert_eq!(from_table.table_element(), table);
        assert_eq!(from_table.table_body(), tbody);
        assert!(!from_table.is_self_embedded());
    }

    #[test]
    fn test_enclosing_table_from_cell() {
        let doc = HtmlDocument::parse(PAGE);
        let table = by_id(&doc, "t");
        let found = find_enclosing_table(&doc, by_id(&doc, "bold")).expect("inside table");
        assert_eq!(found.table_element(), table);
        assert_eq!(found.row_count(&doc), 3);
        assert_eq!(found.cell_at(&doc, 1, 1), Some(by_id(&doc, "c11")));
        assert_eq!(found.cell_at(&doc, 1, 9), None);
        assert_eq!(found.cell_at(&doc, 7, 0), None);
    }

    #[test]
    fn test_nested_table_is_nearest() {
        let doc = HtmlDocument::parse(PAGE);
        let found = find_enclosing_table(&doc, by_id(&doc, "nested")).expect("nested table");
        assert_eq!(found.table_element(), by_id(&doc, "inner"));
        assert_eq!(row_index(&doc, by_id(&doc, "nested")), Ok(0));
        assert_eq!(column_index(&doc, by_id(&doc, "nested")), Ok(0));
    }

    #[test]
    fn test_outside_any_table() {
        let doc = HtmlDocument::parse(PAGE);
        let div = by_id(&doc, "outside");
        assert_eq!(find_enclosing_table(&doc, div), None);
        assert_eq!(
            embedding_row(&doc, div),
            Err(TableError::NotInTable {
                node: div,
                expected: "row"
            })
        );
        assert!(column_index(&doc, div).is_err());
        assert!(row_index(&doc, div).is_err());
    }

    #[test]
    fn test_stray_row_outside_table() {
        let doc =
            HtmlDocument::parse("<html><body><div><tr><td id=x>1</td></tr></div></body></html>");
        let td = by_id(&doc, "x");
        assert_eq!(find_enclosing_table(&doc, td), None);
        assert_eq!(
            column_index(&doc, td),
            Err(TableError::NotInTable {
                node: td,
                expected: "table"
            })
        );
        assert!(row_index(&doc, td).is_err());
    }

    #[test]
    fn test_is_table_or_body() {
        let doc = HtmlDocument::parse(PAGE);
        let table = by_id(&doc, "t");
        assert!(is_table_or_body(&doc, table));
        assert!(is_table_or_body(&doc, first_child(&doc, table)));
        assert!(!is_table_or_body(&doc, by_id(&doc, "c11")));
    }

    #[test]
    fn test_embedding_lookups() {
        let doc = HtmlDocument::parse(PAGE);
        let cell = by_id(&doc, "c11");
        let bold = by_id(&doc, "bold");
        assert_eq!(embedding_cell(&doc, cell), Ok(cell));
        assert_eq!(embedding_row(&doc, cell), Ok(by_id(&doc, "r1")));
        assert_eq!(embedding_row(&doc, bold), Ok(by_id(&doc, "r1")));
        assert_eq!(column_index(&doc, bold), Ok(2));
        assert_eq!(row_index(&doc, bold), Ok(1));

        // A row is not inside a cell
        assert!(embedding_cell(&doc, by_id(&doc, "r1")).is_err());
    }

    #[test]
    fn test_th_counts_as_cell() {
        let doc = HtmlDocument::parse(PAGE);
        assert_eq!(column_index(&doc, by_id(&doc, "c11")), Ok(1));
    }

    #[test]
    fn test_table_without_tbody_reads_row_groups() {
        let doc = HtmlDocument::parse(PAGE);
        let plain = by_id(&doc, "plain");
        let table = find_enclosing_table(&doc, plain).expect("table");
        assert!(table.is_self_embedded());
        assert_eq!(table.row_count(&doc), 1);

        let from_header = find_enclosing_table(&doc, by_id(&doc, "h")).expect("table");
        assert_eq!(from_header.table_element(), plain);
        assert_eq!(row_index(&doc, by_id(&doc, "h")), Ok(0));
    }
}
