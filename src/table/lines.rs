//! Row and column cell sequences
//!
//! Cells are addressed by literal position among the `TD`/`TH` children of a
//! row. `colspan`/`rowspan` are not expanded: a row whose earlier cells span
//! several columns shifts every later cell to the left, and `column_of`
//! silently leaves out rows that are too short.

use super::recognizer::{column_index, embedding_cell, embedding_row, find_enclosing_table};
use super::{is_cell, TableError};
use crate::dom::{DocumentAccess, NodeId};

/// `TD`/`TH` children of a row, in document order
pub fn cells_of_row<D: DocumentAccess + ?Sized>(doc: &D, row: NodeId) -> Vec<NodeId> {
    let mut cells = doc.element_children(row);
    cells.retain(|&c| is_cell(doc, c));
    cells
}

/// All cells of the row embedding `node`
pub fn row_of<D: DocumentAccess + ?Sized>(
    doc: &D,
    node: NodeId,
) -> Result<Vec<NodeId>, TableError> {
    let row = embedding_row(doc, node)?;
    Ok(cells_of_row(doc, row))
}

/// The cell at the same literal column index in every row of the table, in row order
pub fn column_of<D: DocumentAccess + ?Sized>(
    doc: &D,
    node: NodeId,
) -> Result<Vec<NodeId>, TableError> {
    let cell = embedding_cell(doc, node)?;
    let column = column_index(doc, cell)?;
    let table = find_enclosing_table(doc, cell).ok_or(TableError::NotInTable {
        node,
        expected: "table",
    })?;

    Ok(table
        .rows(doc)
        .into_iter()
        .filter_map(|row| cells_of_row(doc, row).get(column).copied())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::HtmlDocument;

    const TABLE: &str = "<table>\
        <tr><td>Jahr</td><td>2001</td><td>2002</td></tr>\
        <tr><td>EPS</td><td>2,78</td><td>3,00</td></tr>\
        <tr><td colspan=2>Quelle</td></tr>\
        <tr><td>KGV</td><td>12</td><td>14</td></tr>\
        </table>";

    fn cell_with_text(doc: &HtmlDocument, text: &str) -> NodeId {
        doc.descendants_vec(doc.document_node_id())
            .into_iter()
            .find(|&n| is_cell(doc, n) && doc.inner_text(n) == text)
            .expect("cell")
    }

    fn texts(doc: &HtmlDocument, cells: &[NodeId]) -> Vec<String> {
        cells.iter().map(|&c| doc.inner_text(c)).collect()
    }

    #[test]
    fn test_row_of() {
        let doc = HtmlDocument::parse(TABLE);
        let cells = row_of(&doc, cell_with_text(&doc, "2,78")).expect("row");
        assert_eq!(texts(&doc, &cells), vec!["EPS", "2,78", "3,00"]);
    }

    #[test]
    fn test_column_of_skips_short_rows() {
        let doc = HtmlDocument::parse(TABLE);
        let cells = column_of(&doc, cell_with_text(&doc, "2,78")).expect("column");
        assert_eq!(texts(&doc, &cells), vec!["2001", "2,78", "12"]);
    }

    #[test]
    fn test_colspan_not_expanded() {
        let doc = HtmlDocument::parse(TABLE);
        let cells = column_of(&doc, cell_with_text(&doc, "Quelle")).expect("column");
        assert_eq!(texts(&doc, &cells), vec!["Jahr", "EPS", "Quelle", "KGV"]);
    }

    #[test]
    fn test_outside_table() {
        let doc = HtmlDocument::parse("<div><span>x</span></div>");
        let span = doc.elements_by_tag("SPAN")[0];
        assert!(row_of(&doc, span).is_err());
        assert!(column_of(&doc, span).is_err());
    }
}
