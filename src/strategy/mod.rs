//! Extraction Strategy Module
//!
//! Ways to run many extractions over one document:
//! - Sequential: one request after another, always available
//! - Parallel: rayon work-stealing across requests (feature `parallel`)

#[cfg(feature = "parallel")]
pub mod parallel;

use crate::dom::{DocumentAccess, NodeId};
use crate::extract::{extract_str, ExtractionResult, TableExtractionSettings};
use serde::{Deserialize, Serialize};

/// One anchor path with the settings to extract it with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    pub anchor: String,
    #[serde(default)]
    pub settings: TableExtractionSettings,
}

impl ExtractionRequest {
    pub fn new(anchor: impl Into<String>, settings: TableExtractionSettings) -> Self {
        ExtractionRequest {
            anchor: anchor.into(),
            settings,
        }
    }
}

/// Run `requests` one after another; results are in request order
pub fn extract_sequential<D: DocumentAccess + ?Sized>(
    doc: &D,
    root: NodeId,
    requests: &[ExtractionRequest],
) -> Vec<ExtractionResult> {
    requests
        .iter()
        .map(|request| extract_str(doc, root, &request.anchor, &request.settings))
        .collect()
}
