//! Structural path parser
//!
//! Grammar (no whitespace anywhere):
//!
//! ```text
//! path    := ('/' segment)+
//! segment := tag '[' index ']'
//! tag     := name-start name-char*        (stored upper-cased)
//! index   := '0' | [1-9][0-9]*            (fits in usize)
//! ```
//!
//! Leading zeros are rejected so that every accepted text is exactly the
//! serialization of the path it parses to.

use super::{PathSegment, StructuralPath};
use crate::core::scanner::{is_name_char, is_name_start_char};
use thiserror::Error;

/// Failure to parse a structural path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathParseError {
    #[error("path is empty")]
    Empty,

    #[error("path must start with '/'")]
    MissingLeadingSlash,

    #[error("malformed segment `{segment}` at position {position}")]
    MalformedSegment { segment: String, position: usize },

    #[error("invalid index `{index}` in segment `{segment}`")]
    InvalidIndex { segment: String, index: String },
}

/// Parse the textual form `/TAG[idx]/TAG[idx]...`
pub fn parse(text: &str) -> Result<StructuralPath, PathParseError> {
    if text.is_empty() {
        return Err(PathParseError::Empty);
    }
    let rest = text
        .strip_prefix('/')
        .ok_or(PathParseError::MissingLeadingSlash)?;

    let segments = rest
        .split('/')
        .enumerate()
        .map(|(position, token)| parse_segment(token, position))
        .collect::<Result<Vec<_>, _>>()?;

    StructuralPath::from_segments(segments).ok_or(PathParseError::Empty)
}

/// Parse one `TAG[idx]` token; `position` is the 0-based segment number
pub(crate) fn parse_segment(token: &str, position: usize) -> Result<PathSegment, PathParseError> {
    let malformed = || PathParseError::MalformedSegment {
        segment: token.to_string(),
        position,
    };

    let (tag, bracketed) = token.split_once('[').ok_or_else(malformed)?;
    let index = bracketed.strip_suffix(']').ok_or_else(malformed)?;
    if !is_valid_tag(tag) || index.contains(|c: char| c == '[' || c == ']') {
        return Err(malformed());
    }

    let invalid_index = || PathParseError::InvalidIndex {
        segment: token.to_string(),
        index: index.to_string(),
    };
    if index.is_empty()
        || !index.bytes().all(|b| b.is_ascii_digit())
        || (index.len() > 1 && index.starts_with('0'))
    {
        return Err(invalid_index());
    }
    let index: usize = index.parse().map_err(|_| invalid_index())?;

    Ok(PathSegment::from_valid(tag, index))
}

/// Check a tag name against the characters the tokenizer accepts for element names
pub(crate) fn is_valid_tag(tag: &str) -> bool {
    let bytes = tag.as_bytes();
    match bytes.split_first() {
        Some((&first, rest)) => is_name_start_char(first) && rest.iter().all(|&b| is_name_char(b)),
        None => false,
    }
}
