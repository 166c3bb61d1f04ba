//! HTML Attribute Parsing
//!
//! Parses attributes from start-tag content. HTML is lenient: values may be
//! double-quoted, single-quoted, unquoted, or missing entirely (boolean attributes).

use super::entities::decode_text;
use std::borrow::Cow;

/// A parsed HTML attribute
#[derive(Debug, Clone)]
pub struct Attribute<'a> {
    /// Attribute name as written
    pub name: Cow<'a, [u8]>,
    /// Attribute value (entities decoded)
    pub value: Cow<'a, [u8]>,
}

impl<'a> Attribute<'a> {
    /// Create a new attribute
    pub fn new(name: &'a [u8], value: Cow<'a, [u8]>) -> Self {
        Attribute {
            name: Cow::Borrowed(name),
            value,
        }
    }

    /// Get the name as a string
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name.as_ref()).ok()
    }

    /// Get the value as a string
    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(self.value.as_ref()).ok()
    }
}

/// Parse attributes from raw tag content (after the element name)
///
/// Input should be the content between element name and '>' or '/>'.
/// Never fails: malformed fragments are skipped.
pub fn parse_attributes(input: &[u8]) -> Vec<Attribute<'_>> {
    let mut attrs = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() || input[pos] == b'>' {
            break;
        }
        if input[pos] == b'/' || input[pos] == b'=' || input[pos] == b'"' || input[pos] == b'\'' {
            pos += 1;
            continue;
        }

        let name_start = pos;
        while pos < input.len() && is_name_char(input[pos]) {
            pos += 1;
        }
        let name = &input[name_start..pos];

        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        if pos >= input.len() || input[pos] != b'=' {
            // Boolean attribute, e.g. <td nowrap>
            attrs.push(Attribute::new(name, Cow::Borrowed(b"")));
            continue;
        }

        pos += 1; // Skip '='
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() {
            attrs.push(Attribute::new(name, Cow::Borrowed(b"")));
            break;
        }

        let quote = input[pos];
        if quote != b'"' && quote != b'\'' {
            let value_start = pos;
            while pos < input.len() && !is_whitespace(input[pos]) && input[pos] != b'>' {
                pos += 1;
            }
            attrs.push(Attribute::new(name, decode_text(&input[value_start..pos])));
            continue;
        }

        pos += 1; // Skip opening quote
        let value_start = pos;
        while pos < input.len() && input[pos] != quote {
            pos += 1;
        }
        attrs.push(Attribute::new(name, decode_text(&input[value_start..pos])));

        if pos < input.len() {
            pos += 1; // Skip closing quote
        }
    }

    attrs
}

/// Check if byte is whitespace
#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C')
}

/// Anything but whitespace, quotes, `/`, `=` and `>` may appear in an HTML attribute name
#[inline]
fn is_name_char(b: u8) -> bool {
    !is_whitespace(b) && !matches!(b, b'"' | b'\'' | b'/' | b'=' | b'>')
}
