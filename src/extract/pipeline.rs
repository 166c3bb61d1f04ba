//! Table extraction pipeline
//!
//! anchor path -> anchor node -> logical table -> series line -> typed records
//!
//! The series line is the row (row-major) or column (column-major) holding the
//! values. It is taken from the anchor when the anchor points into a cell (or,
//! row-major, into a row), otherwise it is looked up by `series_name` among the
//! row labels (row-major) or the column labels (column-major).
//!
//! A record whose header or value cell is missing, or whose text does not
//! coerce, is skipped. Everything else about the extraction is all-or-nothing.

use super::settings::{Dimension, TableExtractionSettings};
use super::value::{coerce, CellValue, ValueType};
use crate::dom::navigate::{resolve, TreeError};
use crate::dom::{DocumentAccess, HtmlDocument, NodeId};
use crate::path::{PathParseError, StructuralPath};
use crate::table::{
    cells_of_row, embedding_cell, embedding_row, find_enclosing_table, LogicalTable,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of one extraction
pub type ExtractionResult = Result<ExtractedSeries, ExtractionError>;

/// Why an extraction produced no series
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("invalid anchor path: {0}")]
    InvalidPath(#[from] PathParseError),

    #[error("anchor not found: {0}")]
    PathNotFound(#[from] TreeError),

    #[error("no table encloses the element at `{path}`")]
    NoEnclosingTable { path: String },

    #[error(
        "series `{}` not located in the table at `{path}`",
        .name.as_deref().unwrap_or("<unnamed>")
    )]
    SeriesNotLocated { path: String, name: Option<String> },
}

/// One decoded (header, value) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    pub header: CellValue,
    pub value: CellValue,
}

/// A typed series read from a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSeries {
    /// `series_name` when configured, otherwise the label of the series line
    pub name: String,
    pub header_type: ValueType,
    pub value_type: ValueType,
    /// Records in iteration order
    pub records: Vec<SeriesRecord>,
}

impl ExtractedSeries {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn headers(&self) -> impl Iterator<Item = &CellValue> {
        self.records.iter().map(|r| &r.header)
    }

    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.records.iter().map(|r| &r.value)
    }
}

/// Series line position within the table grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeriesLine {
    Row(usize),
    Column(usize),
}

/// Extract the series addressed by `anchor` below `root`
pub fn extract<D: DocumentAccess + ?Sized>(
    doc: &D,
    root: NodeId,
    anchor: &StructuralPath,
    settings: &TableExtractionSettings,
) -> ExtractionResult {
    let node = resolve(doc, root, anchor)?;
    let table =
        find_enclosing_table(doc, node).ok_or_else(|| ExtractionError::NoEnclosingTable {
            path: anchor.to_string(),
        })?;

    let rows = table.rows(doc);
    let grid: Vec<Vec<NodeId>> = rows.iter().map(|&row| cells_of_row(doc, row)).collect();

    let line = locate_series(doc, &rows, &grid, node, settings).ok_or_else(|| {
        ExtractionError::SeriesNotLocated {
            path: anchor.to_string(),
            name: settings.series_name.clone(),
        }
    })?;
    log::debug!("{}: series line {:?} in a {}-row table", anchor, line, grid.len());

    let pairs: Vec<(Option<NodeId>, Option<NodeId>)> = match line {
        SeriesLine::Row(series) => (0..grid.get(series).map_or(0, Vec::len))
            .filter(|&c| c >= settings.skip_columns && c != settings.row_header_column)
            .map(|c| (cell(&grid, settings.column_header_row, c), cell(&grid, series, c)))
            .collect(),
        SeriesLine::Column(series) => (0..grid.len())
            .filter(|&r| r >= settings.skip_rows && r != settings.column_header_row)
            .map(|r| (cell(&grid, r, settings.row_header_column), cell(&grid, r, series)))
            .collect(),
    };

    let candidates = pairs.len();
    let records: Vec<SeriesRecord> = pairs
        .into_iter()
        .filter_map(|(header, value)| decode_record(doc, header, value, settings))
        .collect();
    log::debug!(
        "{}: decoded {} of {} candidate records",
        anchor,
        records.len(),
        candidates
    );

    Ok(ExtractedSeries {
        name: series_name(doc, &grid, line, settings),
        header_type: settings.header_type,
        value_type: settings.value_type,
        records,
    })
}

/// Parse `anchor` (through the path cache) and extract
pub fn extract_str<D: DocumentAccess + ?Sized>(
    doc: &D,
    root: NodeId,
    anchor: &str,
    settings: &TableExtractionSettings,
) -> ExtractionResult {
    let path = StructuralPath::parse_cached(anchor)?;
    extract(doc, root, &path, settings)
}

fn cell(grid: &[Vec<NodeId>], row: usize, column: usize) -> Option<NodeId> {
    grid.get(row)?.get(column).copied()
}

fn grid_position(grid: &[Vec<NodeId>], target: NodeId) -> Option<(usize, usize)> {
    grid.iter().enumerate().find_map(|(r, cells)| {
        cells.iter().position(|&c| c == target).map(|c| (r, c))
    })
}

fn locate_series<D: DocumentAccess + ?Sized>(
    doc: &D,
    rows: &[NodeId],
    grid: &[Vec<NodeId>],
    anchor: NodeId,
    settings: &TableExtractionSettings,
) -> Option<SeriesLine> {
    // Anchor inside one of this table's cells
    if let Some((row, column)) = embedding_cell(doc, anchor)
        .ok()
        .and_then(|cell| grid_position(grid, cell))
    {
        return Some(match settings.dimension {
            Dimension::RowMajor => SeriesLine::Row(row),
            Dimension::ColumnMajor => SeriesLine::Column(column),
        });
    }

    if settings.dimension == Dimension::RowMajor {
        if let Some(row) = embedding_row(doc, anchor)
            .ok()
            .and_then(|row| rows.iter().position(|&r| r == row))
        {
            return Some(SeriesLine::Row(row));
        }
    }

    let name = settings.series_name.as_deref()?;
    match settings.dimension {
        Dimension::RowMajor => grid
            .iter()
            .enumerate()
            .skip(settings.skip_rows)
            .find(|(_, cells)| label_matches(doc, cells.get(settings.row_header_column), name))
            .map(|(r, _)| SeriesLine::Row(r)),
        Dimension::ColumnMajor => {
            let header_row = grid.get(settings.column_header_row)?;
            header_row
                .iter()
                .enumerate()
                .skip(settings.skip_columns)
                .find(|&(_, &c)| label_matches(doc, Some(&c), name))
                .map(|(c, _)| SeriesLine::Column(c))
        }
    }
}

fn label_matches<D: DocumentAccess + ?Sized>(doc: &D, cell: Option<&NodeId>, name: &str) -> bool {
    cell.is_some_and(|&c| doc.inner_text(c) == name.trim())
}

fn series_name<D: DocumentAccess + ?Sized>(
    doc: &D,
    grid: &[Vec<NodeId>],
    line: SeriesLine,
    settings: &TableExtractionSettings,
) -> String {
    if let Some(name) = &settings.series_name {
        return name.clone();
    }
    let label = match line {
        SeriesLine::Row(r) => cell(grid, r, settings.row_header_column),
        SeriesLine::Column(c) => cell(grid, settings.column_header_row, c),
    };
    label.map(|c| doc.inner_text(c)).unwrap_or_default()
}

fn decode_record<D: DocumentAccess + ?Sized>(
    doc: &D,
    header: Option<NodeId>,
    value: Option<NodeId>,
    settings: &TableExtractionSettings,
) -> Option<SeriesRecord> {
    let (Some(header), Some(value)) = (header, value) else {
        log::debug!("skipping record: missing header or value cell");
        return None;
    };

    let header_text = doc.inner_text(header);
    let value_text = if settings.extract_link_url {
        link_url(doc, value).unwrap_or_default()
    } else {
        doc.inner_text(value)
    };

    let decoded = coerce(
        &header_text,
        settings.header_type,
        settings.number_format,
        &settings.date_formats,
    )
    .and_then(|header| {
        coerce(
            &value_text,
            settings.value_type,
            settings.number_format,
            &settings.date_formats,
        )
        .map(|value| SeriesRecord { header, value })
    });

    match decoded {
        Ok(record) => Some(record),
        Err(err) => {
            log::debug!("skipping record: {}", err);
            None
        }
    }
}

/// `href` of the first `A` at or below `node`
fn link_url<D: DocumentAccess + ?Sized>(doc: &D, node: NodeId) -> Option<String> {
    std::iter::once(node)
        .chain(doc.descendants_vec(node))
        .find(|&id| doc.has_tag(id, "A") && doc.get_attribute(id, "href").is_some())
        .and_then(|a| doc.get_attribute(a, "href"))
        .map(|href| href.trim().to_string())
}

/// Path-based access on a parsed document, resolving from its root element
impl HtmlDocument {
    /// Element at `path`
    pub fn element_by_path(&self, path: &str) -> Result<NodeId, ExtractionError> {
        let path = StructuralPath::parse_cached(path)?;
        let root = self.root_element_id().ok_or_else(|| TreeError::PathNotFound {
            path: path.to_string(),
            depth: 0,
            segment: path.first().to_string(),
        })?;
        Ok(resolve(self, root, &path)?)
    }

    /// Trimmed, whitespace-collapsed inner text of the element at `path`
    pub fn text_by_path(&self, path: &str) -> Result<String, ExtractionError> {
        let node = self.element_by_path(path)?;
        Ok(self.inner_text(node))
    }

    /// Logical table enclosing the element at `path`
    pub fn table_by_path(&self, path: &str) -> Result<LogicalTable, ExtractionError> {
        let parsed = StructuralPath::parse_cached(path)?;
        let node = self.element_by_path(path)?;
        find_enclosing_table(self, node).ok_or_else(|| ExtractionError::NoEnclosingTable {
            path: parsed.to_string(),
        })
    }

    /// Extract the series anchored at `path`
    pub fn extract_table(
        &self,
        path: &str,
        settings: &TableExtractionSettings,
    ) -> ExtractionResult {
        let anchor = StructuralPath::parse_cached(path)?;
        let root = self.root_element_id().ok_or_else(|| TreeError::PathNotFound {
            path: anchor.to_string(),
            depth: 0,
            segment: anchor.first().to_string(),
        })?;
        extract(self, root, &anchor, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<html><body><div>intro</div><table>\
        <tr><td>Kennzahl</td><td>2004</td><td>2005</td><td>2006</td></tr>\
        <tr><td>EPS</td><td>3,30</td><td>3,33</td><td>4,38</td></tr>\
        <tr><td>KGV</td><td>12,1</td><td>n/a</td><td>14,0</td></tr>\
        <tr><td>Quelle</td><td><a href=\"/q/2004\">Link</a></td>\
        <td><span><a href=\"/q/2005\">L</a></span></td><td>-</td></tr>\
        </table></body></html>";

    fn float_settings() -> TableExtractionSettings {
        TableExtractionSettings::row_major(ValueType::Integer, ValueType::Float)
    }

    fn pairs(series: &ExtractedSeries) -> Vec<(i64, f64)> {
        series
            .records
            .iter()
            .filter_map(|r| Some((r.header.as_i64()?, r.value.as_f64()?)))
            .collect()
    }

    #[test]
    fn test_row_major_from_cell_anchor() {
        let doc = HtmlDocument::parse(PAGE);
        let series = doc
            .extract_table("/BODY[0]/TABLE[0]/TBODY[0]/TR[1]/TD[2]", &float_settings())
            .expect("series");
        assert_eq!(series.name, "EPS");
        assert_eq!(pairs(&series), vec![(2004, 3.30), (2005, 3.33), (2006, 4.38)]);
    }

    #[test]
    fn test_row_major_skips_bad_record() {
        let doc = HtmlDocument::parse(PAGE);
        let series = doc
            .extract_table("/BODY[0]/TABLE[0]/TBODY[0]/TR[2]", &float_settings())
            .expect("series");
        assert_eq!(series.name, "KGV");
        assert_eq!(pairs(&series), vec![(2004, 12.1), (2006, 14.0)]);
    }

    #[test]
    fn test_row_major_by_series_name() {
        let doc = HtmlDocument::parse(PAGE);
        let mut settings = float_settings();
        settings.series_name = Some("EPS".to_string());
        let series = doc
            .extract_table("/BODY[0]/TABLE[0]", &settings)
            .expect("series");
        assert_eq!(series.len(), 3);

        settings.series_name = Some("Umsatz".to_string());
        let err = doc
            .extract_table("/BODY[0]/TABLE[0]", &settings)
            .expect_err("no such row");
        assert_eq!(
            err,
            ExtractionError::SeriesNotLocated {
                path: "/BODY[0]/TABLE[0]".to_string(),
                name: Some("Umsatz".to_string())
            }
        );
    }

    #[test]
    fn test_series_name_respects_skip_rows() {
        let doc = HtmlDocument::parse(PAGE);
        let mut settings = float_settings();
        settings.series_name = Some("EPS".to_string());
        settings.skip_rows = 2;
        assert!(matches!(
            doc.extract_table("/BODY[0]/TABLE[0]", &settings),
            Err(ExtractionError::SeriesNotLocated { .. })
        ));
    }

    #[test]
    fn test_table_anchor_without_name_fails() {
        let doc = HtmlDocument::parse(PAGE);
        let err = doc
            .extract_table("/BODY[0]/TABLE[0]", &float_settings())
            .expect_err("series unknown");
        assert_eq!(
            err.to_string(),
            "series `<unnamed>` not located in the table at `/BODY[0]/TABLE[0]`"
        );
    }

    #[test]
    fn test_column_major() {
        let doc = HtmlDocument::parse(PAGE);
        let mut settings = TableExtractionSettings::column_major(ValueType::Text, ValueType::Float);
        settings.skip_columns = 1;
        settings.series_name = Some("2005".to_string());
        let series = doc
            .extract_table("/BODY[0]/TABLE[0]/TBODY[0]", &settings)
            .expect("series");
        let decoded: Vec<_> = series
            .records
            .iter()
            .map(|r| (r.header.to_string(), r.value.as_f64()))
            .collect();
        assert_eq!(decoded, vec![("EPS".to_string(), Some(3.33))]);
    }

    #[test]
    fn test_column_major_from_cell_anchor() {
        let doc = HtmlDocument::parse(PAGE);
        let settings = TableExtractionSettings::column_major(ValueType::Text, ValueType::Text);
        let series = doc
            .extract_table("/BODY[0]/TABLE[0]/TBODY[0]/TR[0]/TD[3]", &settings)
            .expect("series");
        assert_eq!(series.name, "2006");
        let values: Vec<_> = series.values().map(|v| v.to_string()).collect();
        assert_eq!(values, vec!["4,38", "14,0", "-"]);
    }

    #[test]
    fn test_extract_link_url() {
        let doc = HtmlDocument::parse(PAGE);
        let mut settings = TableExtractionSettings::row_major(ValueType::Integer, ValueType::Text);
        settings.extract_link_url = true;
        let series = doc
            .extract_table("/BODY[0]/TABLE[0]/TBODY[0]/TR[3]/TD[0]", &settings)
            .expect("series");
        let values: Vec<_> = series.values().map(|v| v.to_string()).collect();
        assert_eq!(values, vec!["/q/2004", "/q/2005"]);
    }

    #[test]
    fn test_failures() {
        let doc = HtmlDocument::parse(PAGE);
        let settings = float_settings();
        assert!(matches!(
            doc.extract_table("BODY[0]", &settings),
            Err(ExtractionError::InvalidPath(PathParseError::MissingLeadingSlash))
        ));
        assert!(matches!(
            doc.extract_table("/BODY[0]/TABLE[3]", &settings),
            Err(ExtractionError::PathNotFound(TreeError::PathNotFound { depth: 1, .. }))
        ));
        assert_eq!(
            doc.extract_table("/BODY[0]/DIV[0]", &settings),
            Err(ExtractionError::NoEnclosingTable {
                path: "/BODY[0]/DIV[0]".to_string()
            })
        );
    }

    #[test]
    fn test_no_table_error_names_normalized_path() {
        let doc = HtmlDocument::parse(PAGE);
        let expected = Some(ExtractionError::NoEnclosingTable {
            path: "/BODY[0]/DIV[0]".to_string(),
        });
        assert_eq!(doc.table_by_path("/body[0]/div[0]").err(), expected);
        assert_eq!(
            doc.extract_table("/body[0]/div[0]", &float_settings()).err(),
            expected
        );
    }

    #[test]
    fn test_empty_series_is_success() {
        let doc = HtmlDocument::parse(PAGE);
        let settings = TableExtractionSettings::row_major(ValueType::Date, ValueType::Float);
        let series = doc
            .extract_table("/BODY[0]/TABLE[0]/TBODY[0]/TR[1]", &settings)
            .expect("series");
        assert!(series.is_empty());
    }

    #[test]
    fn test_path_helpers() {
        let doc = HtmlDocument::parse(PAGE);
        assert_eq!(
            doc.text_by_path("/BODY[0]/TABLE[0]/TBODY[0]/TR[1]/TD[0]"),
            Ok("EPS".to_string())
        );
        let table = doc.table_by_path("/BODY[0]/TABLE[0]").expect("table");
        assert_eq!(table.row_count(&doc), 4);
        assert!(matches!(
            doc.table_by_path("/BODY[0]/DIV[0]"),
            Err(ExtractionError::NoEnclosingTable { .. })
        ));
        let empty = HtmlDocument::parse("");
        assert!(matches!(
            empty.element_by_path("/BODY[0]"),
            Err(ExtractionError::PathNotFound(_))
        ));
    }
}
