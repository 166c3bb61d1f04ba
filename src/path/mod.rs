//! Structural Paths
//!
//! A structural path addresses one element by position: each segment selects
//! the Nth (0-based) element child with a given tag at that depth, e.g.
//! `/BODY[0]/DIV[5]/TABLE[7]/TBODY[0]/TR[6]/TD[1]`.
//!
//! Paths are immutable values, independent of any document instance.

pub mod cache;
pub mod parser;

pub use cache::PathCache;
pub use parser::PathParseError;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One `TAG[index]` step of a structural path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    tag: String,
    index: usize,
}

impl PathSegment {
    /// Create a segment; the tag is upper-cased and must be a valid element name
    pub fn new(tag: &str, index: usize) -> Result<Self, PathParseError> {
        if parser::is_valid_tag(tag) {
            Ok(Self::from_valid(tag, index))
        } else {
            Err(PathParseError::MalformedSegment {
                segment: format!("{}[{}]", tag, index),
                position: 0,
            })
        }
    }

    pub(crate) fn from_valid(tag: &str, index: usize) -> Self {
        PathSegment {
            tag: tag.to_ascii_uppercase(),
            index,
        }
    }

    /// Upper-cased tag name
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// 0-based position among same-tag element siblings
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.tag, self.index)
    }
}

/// Non-empty sequence of path segments
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StructuralPath {
    segments: Vec<PathSegment>,
}

impl StructuralPath {
    /// Single-segment path
    pub fn new(first: PathSegment) -> Self {
        StructuralPath {
            segments: vec![first],
        }
    }

    /// Build from segments; None when `segments` is empty
    pub fn from_segments(segments: Vec<PathSegment>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(StructuralPath { segments })
        }
    }

    /// Parse the textual form
    pub fn parse(text: &str) -> Result<Self, PathParseError> {
        parser::parse(text)
    }

    /// Parse through the process-wide [`PathCache`]
    pub fn parse_cached(text: &str) -> Result<Self, PathParseError> {
        cache::global().parse(text)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments (always at least one)
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn first(&self) -> &PathSegment {
        &self.segments[0]
    }

    pub fn last(&self) -> &PathSegment {
        &self.segments[self.segments.len() - 1]
    }

    /// New path one level deeper
    pub fn append(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        StructuralPath { segments }
    }

    /// Path one level up; None for a single-segment path
    pub fn parent(&self) -> Option<Self> {
        Self::from_segments(self.segments[..self.segments.len() - 1].to_vec())
    }

    /// Last segment is a table or table body
    pub fn points_to_table(&self) -> bool {
        matches!(self.last().tag(), "TABLE" | "TBODY")
    }

    /// Last segment is a table cell
    pub fn points_to_table_cell(&self) -> bool {
        matches!(self.last().tag(), "TD" | "TH")
    }
}

impl fmt::Display for StructuralPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for StructuralPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse(s)
    }
}

impl TryFrom<String> for StructuralPath {
    type Error = PathParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parser::parse(&value)
    }
}

impl From<StructuralPath> for String {
    fn from(path: StructuralPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(tag: &str, index: usize) -> PathSegment {
        PathSegment::new(tag, index).expect("valid segment")
    }

    #[test]
    fn test_append_is_immutable() {
        let base = StructuralPath::new(seg("body", 0));
        let deeper = base.append(seg("div", 5));
        assert_eq!(base.to_string(), "/BODY[0]");
        assert_eq!(deeper.to_string(), "/BODY[0]/DIV[5]");
        assert_eq!(deeper.parent(), Some(base.clone()));
        assert_eq!(base.parent(), None);
    }

    #[test]
    fn test_points_to() {
        let table: StructuralPath = "/BODY[0]/TABLE[7]".parse().expect("path");
        assert!(table.points_to_table());
        assert!(!table.points_to_table_cell());

        let body = table.append(seg("TBODY", 0));
        assert!(body.points_to_table());

        let cell = body.append(seg("TR", 6)).append(seg("TD", 1));
        assert!(cell.points_to_table_cell());
        assert!(!cell.points_to_table());
        assert_eq!(cell.first().tag(), "BODY");
    }

    #[test]
    fn test_invalid_segment() {
        assert!(PathSegment::new("", 0).is_err());
        assert!(PathSegment::new("T D", 0).is_err());
        assert!(PathSegment::new("TD[1]", 0).is_err());
    }

    #[test]
    fn test_from_segments_rejects_empty() {
        assert_eq!(StructuralPath::from_segments(Vec::new()), None);
    }

    #[test]
    fn test_serde_as_string() {
        let path: StructuralPath = "/BODY[0]/TABLE[1]".parse().expect("path");
        let json = serde_json::to_string(&path).expect("serialize");
        assert_eq!(json, "\"/BODY[0]/TABLE[1]\"");
        let back: StructuralPath = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, path);
        assert!(serde_json::from_str::<StructuralPath>("\"BODY[0]\"").is_err());
    }
}
