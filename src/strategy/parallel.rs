//! Parallel Extraction
//!
//! Uses Rayon to run many extraction requests over one shared, read-only document.

use super::ExtractionRequest;
use crate::dom::{DocumentAccess, NodeId};
use crate::extract::{extract_str, ExtractionResult};
use rayon::prelude::*;

/// Run `requests` in parallel; results are in request order
pub fn extract_parallel<D: DocumentAccess + Sync + ?Sized>(
    doc: &D,
    root: NodeId,
    requests: &[ExtractionRequest],
) -> Vec<ExtractionResult> {
    requests
        .par_iter()
        .map(|request| extract_str(doc, root, &request.anchor, &request.settings))
        .collect()
}

/// Run `requests` in parallel, keeping only successful series keyed by anchor
pub fn extract_map<D: DocumentAccess + Sync + ?Sized>(
    doc: &D,
    root: NodeId,
    requests: &[ExtractionRequest],
) -> Vec<(String, crate::extract::ExtractedSeries)> {
    requests
        .par_iter()
        .filter_map(|request| {
            match extract_str(doc, root, &request.anchor, &request.settings) {
                Ok(series) => Some((request.anchor.clone(), series)),
                Err(err) => {
                    log::debug!("{}: {}", request.anchor, err);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::HtmlDocument;
    use crate::extract::{TableExtractionSettings, ValueType};
    use crate::strategy::extract_sequential;

    const PAGE: &str = "<html><body><table>\
        <tr><td></td><td>2005</td><td>2006</td></tr>\
        <tr><td>EPS</td><td>3,33</td><td>4,38</td></tr>\
        <tr><td>KGV</td><td>12,0</td><td>14,5</td></tr>\
        </table></body></html>";

    fn requests() -> Vec<ExtractionRequest> {
        let settings = TableExtractionSettings::row_major(ValueType::Integer, ValueType::Float);
        vec![
            ExtractionRequest::new("/BODY[0]/TABLE[0]/TBODY[0]/TR[1]", settings.clone()),
            ExtractionRequest::new("/BODY[0]/TABLE[0]/TBODY[0]/TR[2]", settings.clone()),
            ExtractionRequest::new("/BODY[0]/DIV[0]", settings.clone()),
            ExtractionRequest::new("not a path", settings),
        ]
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let doc = HtmlDocument::parse(PAGE);
        let root = doc.root_element_id().expect("root");
        let parallel = extract_parallel(&doc, root, &requests());
        let sequential = extract_sequential(&doc, root, &requests());
        assert_eq!(parallel.len(), 4);
        assert_eq!(parallel, sequential);
        assert!(parallel[0].is_ok());
        assert!(parallel[2].is_err());
        assert!(parallel[3].is_err());
    }

    #[test]
    fn test_extract_map() {
        let doc = HtmlDocument::parse(PAGE);
        let root = doc.root_element_id().expect("root");
        let results = extract_map(&doc, root, &requests());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].1.name, "EPS");
        assert_eq!(results[1].1.name, "KGV");
    }
}
