//! HTML Event Types
//!
//! Event types for pull-parser style HTML processing.

use crate::core::attributes::Attribute;
use std::borrow::Cow;

/// HTML parsing event
#[derive(Debug, Clone)]
pub enum HtmlEvent<'a> {
    /// Start of an element: <name attrs...>
    StartElement(StartElement<'a>),
    /// End of an element: </name>
    EndElement(EndElement<'a>),
    /// Self-closing element: <name attrs.../>
    EmptyElement(StartElement<'a>),
    /// Text content between tags (entities decoded)
    Text(Cow<'a, [u8]>),
    /// Comment content
    Comment(Cow<'a, [u8]>),
    /// DOCTYPE declaration
    DocType(Cow<'a, [u8]>),
    /// End of document
    EndDocument,
}

/// Start element event data
#[derive(Debug, Clone)]
pub struct StartElement<'a> {
    /// Element name as written in the markup
    pub name: Cow<'a, [u8]>,
    /// Element attributes
    pub attributes: Vec<Attribute<'a>>,
}

impl<'a> StartElement<'a> {
    /// Create a new start element from a Cow
    pub fn from_cow(name: Cow<'a, [u8]>, attributes: Vec<Attribute<'a>>) -> Self {
        StartElement { name, attributes }
    }

    /// Get the name as a string
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name.as_ref()).ok()
    }

    /// Get an attribute value by name (ASCII case-insensitive)
    pub fn get_attribute_value(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name.as_bytes()))
            .and_then(|a| a.value_str())
    }
}

/// End element event data
#[derive(Debug, Clone)]
pub struct EndElement<'a> {
    /// Element name as written in the markup
    pub name: Cow<'a, [u8]>,
}

impl<'a> EndElement<'a> {
    /// Create a new end element from a Cow
    pub fn from_cow(name: Cow<'a, [u8]>) -> Self {
        EndElement { name }
    }

    /// Get the name as a string
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name.as_ref()).ok()
    }
}

impl<'a> HtmlEvent<'a> {
    /// Get as start element if applicable
    pub fn as_start_element(&self) -> Option<&StartElement<'a>> {
        match self {
            HtmlEvent::StartElement(e) | HtmlEvent::EmptyElement(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if applicable
    pub fn as_text(&self) -> Option<&[u8]> {
        match self {
            HtmlEvent::Text(t) => Some(t.as_ref()),
            _ => None,
        }
    }
}
